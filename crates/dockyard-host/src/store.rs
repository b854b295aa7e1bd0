// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON file persistence for the host.
//
// Every file is pretty-printed JSON. Reads are forgiving (missing or corrupt
// files fall back to defaults), writes are strict and atomic: the payload
// goes to a temporary sibling which is then renamed over the target.

use std::path::{Path, PathBuf};

use dockyard_core::error::Result;
use dockyard_core::types::{Preferences, Service, SessionState};
use dockyard_core::AppConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

const SERVICES_FILE: &str = "services.json";
const PREFERENCES_FILE: &str = "preferences.json";
const STATE_FILE: &str = "state.json";
const CONFIG_FILE: &str = "config.json";
/// Where an unparseable service list is moved before defaults are seeded.
const CORRUPT_SERVICES_FILE: &str = "services.json.corrupt";

/// Service list written on first run.
const DEFAULT_SERVICES: &str = include_str!("../assets/default_services.json");

/// File-backed store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the service list, seeding it from the built-in defaults when no
    /// file exists yet. A file that does not parse is renamed to
    /// `services.json.corrupt` first, so a later save cannot overwrite it.
    /// Entries whose URL does not parse are skipped.
    pub fn load_services(&self) -> Result<Vec<Service>> {
        let path = self.dir.join(SERVICES_FILE);
        let services = match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<Vec<Service>>(&data) {
                Ok(services) => services,
                Err(e) => {
                    let aside = self.dir.join(CORRUPT_SERVICES_FILE);
                    warn!(
                        path = %path.display(),
                        aside = %aside.display(),
                        "corrupt service list, setting it aside: {e}"
                    );
                    std::fs::rename(&path, &aside)?;
                    self.seed_services(&path)?
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no service list yet, seeding defaults");
                self.seed_services(&path)?
            }
            Err(e) => return Err(e.into()),
        };

        let before = services.len();
        let kept: Vec<Service> = services
            .into_iter()
            .filter(|s| match Url::parse(&s.url) {
                Ok(_) => true,
                Err(e) => {
                    warn!(id = %s.id, url = %s.url, "skipping service with invalid URL: {e}");
                    false
                }
            })
            .collect();
        debug!(loaded = kept.len(), skipped = before - kept.len(), "services loaded");
        Ok(kept)
    }

    fn seed_services(&self, path: &Path) -> Result<Vec<Service>> {
        write_atomic(path, DEFAULT_SERVICES.as_bytes())?;
        Ok(serde_json::from_str(DEFAULT_SERVICES)?)
    }

    pub fn save_services(&self, services: &[Service]) -> Result<()> {
        self.write_json(SERVICES_FILE, &services)
    }

    /// Stored preferences, clamped and repaired.
    pub fn load_preferences(&self) -> Preferences {
        read_or_default::<Preferences>(&self.dir.join(PREFERENCES_FILE)).normalized()
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.write_json(PREFERENCES_FILE, preferences)
    }

    pub fn load_state(&self) -> SessionState {
        read_or_default(&self.dir.join(STATE_FILE))
    }

    pub fn save_state(&self, state: &SessionState) -> Result<()> {
        self.write_json(STATE_FILE, state)
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&self.dir.join(file), json.as_bytes())
    }
}

/// Load `config.json` from `dir`, or defaults.
pub fn load_config(dir: &Path) -> AppConfig {
    read_or_default(&dir.join(CONFIG_FILE))
}

pub fn persist_config(dir: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(&dir.join(CONFIG_FILE), json.as_bytes())
}

fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(path = %path.display(), "unreadable file, using defaults: {e}");
            return T::default();
        }
    };
    serde_json::from_str(&data).unwrap_or_else(|e| {
        warn!(path = %path.display(), "corrupt file, using defaults: {e}");
        T::default()
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_core::types::ServiceId;
    use dockyard_core::{PersistPolicy, ServiceIcon};

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::new(dir.path().join("data"));
        (dir, store)
    }

    fn service(id: &str, url: &str) -> Service {
        Service {
            id: ServiceId::new(id),
            name: id.to_string(),
            url: url.to_string(),
            icon: ServiceIcon::default(),
        }
    }

    #[test]
    fn first_load_seeds_defaults() {
        let (_tmp, store) = store();
        let services = store.load_services().expect("load");
        assert!(!services.is_empty());
        assert!(store.dir().join(SERVICES_FILE).exists());
    }

    #[test]
    fn saved_services_round_trip_in_order() {
        let (_tmp, store) = store();
        let list = vec![service("b", "https://b.test"), service("a", "https://a.test")];
        store.save_services(&list).expect("save");
        assert_eq!(store.load_services().expect("load"), list);
    }

    #[test]
    fn invalid_urls_are_filtered_on_load() {
        let (_tmp, store) = store();
        store
            .save_services(&[service("ok", "https://ok.test"), service("bad", "not a url")])
            .expect("save");
        let loaded = store.load_services().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, ServiceId::new("ok"));
    }

    #[test]
    fn corrupt_services_file_is_set_aside_and_defaults_seeded() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(store.dir()).expect("mkdir");
        std::fs::write(store.dir().join(SERVICES_FILE), "{ nope").expect("write");

        let loaded = store.load_services().expect("load");
        let defaults: Vec<Service> = serde_json::from_str(DEFAULT_SERVICES).expect("defaults");
        assert!(!loaded.is_empty());
        assert_eq!(loaded, defaults);

        let aside = std::fs::read_to_string(store.dir().join(CORRUPT_SERVICES_FILE)).expect("aside");
        assert_eq!(aside, "{ nope");
    }

    #[test]
    fn save_after_corrupt_load_keeps_the_corrupt_copy() {
        let (_tmp, store) = store();
        std::fs::create_dir_all(store.dir()).expect("mkdir");
        std::fs::write(store.dir().join(SERVICES_FILE), "[{\"id\": 1").expect("write");
        store.load_services().expect("load");

        store.save_services(&[service("a", "https://a.test")]).expect("save");
        let aside = std::fs::read_to_string(store.dir().join(CORRUPT_SERVICES_FILE)).expect("aside");
        assert_eq!(aside, "[{\"id\": 1");
    }

    #[test]
    fn preferences_default_when_missing_and_repair_when_bad() {
        let (_tmp, store) = store();
        assert_eq!(store.load_preferences(), Preferences::default());

        std::fs::create_dir_all(store.dir()).expect("mkdir");
        std::fs::write(
            store.dir().join(PREFERENCES_FILE),
            r##"{"icon_size": 2, "sidebar_color": "#000"}"##,
        )
        .expect("write");
        let prefs = store.load_preferences();
        assert_eq!(prefs.icon_size, 24);
        assert_eq!(prefs.sidebar_color, "#000");
    }

    #[test]
    fn state_round_trip() {
        let (_tmp, store) = store();
        assert_eq!(store.load_state(), SessionState::default());
        let state = SessionState {
            last_active_service: Some(ServiceId::new("mail")),
        };
        store.save_state(&state).expect("save");
        assert_eq!(store.load_state(), state);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let (_tmp, store) = store();
        store.save_state(&SessionState::default()).expect("save");
        assert!(!store.dir().join("state.json.tmp").exists());
    }

    #[test]
    fn write_into_file_path_fails() {
        let (tmp, _) = store();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").expect("write");
        let store = Store::new(&blocker);
        assert!(store.save_services(&[]).is_err());
    }

    #[test]
    fn config_round_trip() {
        let (tmp, _) = store();
        let config = AppConfig {
            persist_policy: PersistPolicy::Rollback,
            ..AppConfig::default()
        };
        persist_config(tmp.path(), &config).expect("persist");
        assert_eq!(load_config(tmp.path()).persist_policy, PersistPolicy::Rollback);
    }
}
