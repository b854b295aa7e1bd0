// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What a surface does with its optimistic in-memory change when the host
/// rejects the save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistPolicy {
    /// Keep the local change and report the failure. The local list may
    /// drift from the host until the next reload.
    #[default]
    KeepOptimistic,
    /// Restore the pre-mutation list, unless a newer mutation has been
    /// applied since.
    Rollback,
}

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Override for the data directory (services, preferences, state).
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Idle time after which a background content view is unloaded.
    pub hibernation_after_secs: u64,
    /// Interval between hibernation sweeps.
    pub hibernation_check_secs: u64,
    /// Settings-surface behaviour on failed saves.
    pub persist_policy: PersistPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: "info".to_string(),
            hibernation_after_secs: 600,
            hibernation_check_secs: 60,
            persist_policy: PersistPolicy::KeepOptimistic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"persist_policy": "rollback"}"#).unwrap();
        assert_eq!(cfg.persist_policy, PersistPolicy::Rollback);
        assert_eq!(cfg.hibernation_after_secs, 600);
        assert_eq!(cfg.log_filter, "info");
    }
}
