// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dockyard surfaces — sidebar and settings state, independent of rendering.

pub mod preferences;
pub mod settings;
pub mod sidebar;

pub use preferences::{PreferenceStore, PreferencesPatch};
pub use settings::{FormTarget, PersistRequest, SaveOutcome, SettingsSession};
pub use sidebar::{SidebarItem, SidebarSession};
