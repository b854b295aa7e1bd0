// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Dockyard shell.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DockyardError;
use crate::icon::ServiceIcon;

/// Stable external key of a service, derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id for a display name.
    pub fn from_name(name: &str) -> Self {
        Self(crate::slug::slugify(name.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry of the ordered service list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub url: String,
    pub icon: ServiceIcon,
}

/// Unvalidated form input for creating or editing a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub url: String,
    /// Typed emoji / text glyph.
    pub icon_text: Option<String>,
    /// Data URL produced by the image picker.
    pub icon_image: Option<String>,
}

impl ServiceDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_icon_text(mut self, text: impl Into<String>) -> Self {
        self.icon_text = Some(text.into());
        self
    }

    pub fn with_icon_image(mut self, data_url: impl Into<String>) -> Self {
        self.icon_image = Some(data_url.into());
        self
    }

    /// Pre-fill a draft from an existing service (the edit form).
    pub fn from_service(service: &Service) -> Self {
        let (icon_text, icon_image) = match &service.icon {
            ServiceIcon::Emoji(s) => (Some(s.clone()), None),
            ServiceIcon::Image(s) => (None, Some(s.clone())),
        };
        Self {
            name: service.name.clone(),
            url: service.url.clone(),
            icon_text,
            icon_image,
        }
    }
}

/// Smallest sidebar icon size in pixels.
pub const ICON_SIZE_MIN: u32 = 24;
/// Largest sidebar icon size in pixels.
pub const ICON_SIZE_MAX: u32 = 64;

fn default_icon_size() -> u32 {
    40
}

fn default_sidebar_color() -> String {
    "#16213e".to_string()
}

fn default_accent_color() -> String {
    "#e94560".to_string()
}

fn default_notifications_enabled() -> bool {
    true
}

/// User preferences, independent of the service list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
    #[serde(default = "default_sidebar_color")]
    pub sidebar_color: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_notifications_enabled")]
    pub notifications_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            icon_size: default_icon_size(),
            sidebar_color: default_sidebar_color(),
            accent_color: default_accent_color(),
            notifications_enabled: default_notifications_enabled(),
        }
    }
}

impl Preferences {
    /// Repair values loaded from disk: clamp the icon size and replace
    /// malformed colors with their defaults.
    pub fn normalized(mut self) -> Self {
        self.icon_size = self.icon_size.clamp(ICON_SIZE_MIN, ICON_SIZE_MAX);
        if !is_hex_color(&self.sidebar_color) {
            self.sidebar_color = default_sidebar_color();
        }
        if !is_hex_color(&self.accent_color) {
            self.accent_color = default_accent_color();
        }
        self
    }

    /// Reject values a save must not persist.
    pub fn validate(&self) -> Result<(), DockyardError> {
        if !(ICON_SIZE_MIN..=ICON_SIZE_MAX).contains(&self.icon_size) {
            return Err(DockyardError::InvalidPreference(format!(
                "icon size {} is outside {ICON_SIZE_MIN}..={ICON_SIZE_MAX}",
                self.icon_size
            )));
        }
        for (field, value) in [("sidebar color", &self.sidebar_color), ("accent color", &self.accent_color)] {
            if !is_hex_color(value) {
                return Err(DockyardError::InvalidPreference(format!("{field} '{value}' is not a hex color")));
            }
        }
        Ok(())
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Badge counts keyed by service id. Zero counts are never stored.
pub type BadgeCounts = HashMap<ServiceId, u32>;

/// Which content the main area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_service: Option<ServiceId>,
    pub settings_open: bool,
}

/// Host-persisted session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub last_active_service: Option<ServiceId>,
}
