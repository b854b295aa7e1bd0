// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// UI pages for the Dockyard shell.

pub mod content;
pub mod settings;
pub mod sidebar;
