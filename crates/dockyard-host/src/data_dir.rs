// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::{Path, PathBuf};

use dockyard_core::AppConfig;

/// Environment variable that overrides every other location.
pub const DATA_DIR_ENV: &str = "DOCKYARD_DATA_DIR";

const APP_DIR: &str = "dockyard";

/// Directory holding `config.json`. Not affected by `AppConfig::data_dir`,
/// which is read from that file.
pub fn base_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    platform_dir()
}

/// Directory holding services, preferences and session state.
pub fn data_dir(config: &AppConfig) -> PathBuf {
    resolve(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from), config.data_dir.as_deref())
}

fn resolve(env: Option<PathBuf>, configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = env.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    platform_dir()
}

fn platform_dir() -> PathBuf {
    // XDG data dir on Linux, Application Support on macOS, %APPDATA% on Windows
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_beats_config() {
        let dir = resolve(Some(PathBuf::from("/env")), Some(Path::new("/cfg")));
        assert_eq!(dir, PathBuf::from("/env"));
    }

    #[test]
    fn config_beats_platform_default() {
        assert_eq!(resolve(None, Some(Path::new("/cfg"))), PathBuf::from("/cfg"));
    }

    #[test]
    fn empty_env_is_ignored() {
        assert_eq!(resolve(Some(PathBuf::new()), Some(Path::new("/cfg"))), PathBuf::from("/cfg"));
    }

    #[test]
    fn platform_default_ends_in_app_dir() {
        assert!(resolve(None, None).ends_with(APP_DIR));
    }
}
