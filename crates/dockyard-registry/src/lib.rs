// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dockyard Registry — the ordered service list and everything that mutates
// it: draft validation, identity checks, and the drag-to-reorder engine.
// Everything here is synchronous and free of I/O; surfaces persist the
// results through the bridge.

pub mod registry;
pub mod reorder;
pub mod validator;

pub use registry::{Mutation, ServiceRegistry};
pub use reorder::{DragSession, DragState, ReorderRequest, RowBounds};
pub use validator::{ValidDraft, validate};
