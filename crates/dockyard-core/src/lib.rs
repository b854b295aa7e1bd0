// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dockyard — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod icon;
pub mod slug;
pub mod types;

pub use config::{AppConfig, PersistPolicy};
pub use error::{DockyardError, FieldError, ValidationErrors};
pub use icon::ServiceIcon;
pub use slug::slugify;
pub use types::*;
