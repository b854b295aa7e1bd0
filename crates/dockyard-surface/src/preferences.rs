// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preference store for a surface.
//
// Loads the host's preferences once and writes the full record back on
// save. It never pushes to other surfaces; the host does that after a
// successful save.

use dockyard_bridge::HostBridge;
use dockyard_core::error::{DockyardError, Result};
use dockyard_core::types::Preferences;
use tracing::{info, warn};

/// Fields to change. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub icon_size: Option<u32>,
    pub sidebar_color: Option<String>,
    pub accent_color: Option<String>,
    pub notifications_enabled: Option<bool>,
}

impl PreferencesPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The full record `current` becomes with this patch applied.
    pub fn apply_to(&self, current: &Preferences) -> Preferences {
        Preferences {
            icon_size: self.icon_size.unwrap_or(current.icon_size),
            sidebar_color: self
                .sidebar_color
                .clone()
                .unwrap_or_else(|| current.sidebar_color.clone()),
            accent_color: self
                .accent_color
                .clone()
                .unwrap_or_else(|| current.accent_color.clone()),
            notifications_enabled: self
                .notifications_enabled
                .unwrap_or(current.notifications_enabled),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    current: Preferences,
}

impl PreferenceStore {
    pub async fn load(host: &dyn HostBridge) -> Result<Self> {
        let current = host.get_preferences().await?;
        Ok(Self { current })
    }

    pub fn current(&self) -> &Preferences {
        &self.current
    }

    /// Validate the patched record and write it to the host. The local copy
    /// only changes once the host has accepted it.
    pub async fn save(&mut self, host: &dyn HostBridge, patch: &PreferencesPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let next = patch.apply_to(&self.current);
        next.validate()?;
        host.save_preferences(next.clone())
            .await
            .map_err(|e| match e {
                DockyardError::InvalidPreference(_) => e,
                other => other.into_persistence(),
            })
            .inspect_err(|e| warn!("saving preferences failed: {e}"))?;
        info!(icon_size = next.icon_size, "preferences saved");
        self.current = next;
        Ok(())
    }
}
