// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dockyard host — canonical state, persistence, badges and view bookkeeping.

pub mod badges;
pub mod data_dir;
pub mod host;
pub mod notify;
pub mod store;
pub mod views;

pub use host::DesktopHost;
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use store::Store;
pub use views::{Reconciliation, ViewCommand, ViewTracker};
