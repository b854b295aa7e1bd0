// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Dockyard — host/surface sync bridge.
//!
//! Two asymmetric channels connect a surface to the host process:
//!
//! - **pull** ([`HostBridge`]): surface-initiated request/response calls that
//!   may fail (load and persist state, switch service, reload, restart ...).
//! - **push** ([`PushHub`]): host-initiated, fire-and-forget, at-most-once
//!   delivery of badge counts and preferences to a mounted surface. A push to
//!   a surface that is not mounted is dropped; the surface's next full load
//!   is the only recovery.

pub mod memory;
pub mod push;
pub mod traits;

pub use memory::{HostCall, MemoryHost};
pub use push::{Delivery, PushHub, PushMessage, PushReceiver, SurfaceKind};
pub use traits::{BridgeFuture, HostBridge};
