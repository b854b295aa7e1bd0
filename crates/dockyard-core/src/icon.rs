// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Icon variants — an icon is persisted as a single string and classified by
// prefix: embedded image data URLs start with `data:image`, anything else is
// an emoji or short text glyph.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix that marks an icon string as embedded image data.
pub const IMAGE_MARKER: &str = "data:image";

/// Glyph used when the user supplied neither an image nor text.
pub const DEFAULT_GLYPH: &str = "\u{1F310}";

/// How a service icon is represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceIcon {
    /// Emoji or short text rendered as-is.
    Emoji(String),
    /// A `data:image/...` URL rendered as an image.
    Image(String),
}

impl ServiceIcon {
    /// Classify a stored icon string. Total: every string is exactly one
    /// variant.
    pub fn classify(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.starts_with(IMAGE_MARKER) {
            Self::Image(s)
        } else {
            Self::Emoji(s)
        }
    }

    /// Turn the two icon form inputs into one stored icon.
    ///
    /// Precedence: image data URL, then typed emoji text, then the default
    /// glyph. Blank inputs count as absent.
    pub fn resolve_for_save(data_url: Option<&str>, emoji_text: Option<&str>) -> Self {
        if let Some(data) = data_url.filter(|d| !d.trim().is_empty()) {
            return Self::classify(data);
        }
        if let Some(text) = emoji_text.map(str::trim).filter(|t| !t.is_empty()) {
            return Self::classify(text);
        }
        Self::default()
    }

    /// Build an image icon from raw file bytes and their MIME type.
    pub fn from_image_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::Image(format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Emoji(s) | Self::Image(s) => s,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

impl Default for ServiceIcon {
    fn default() -> Self {
        Self::Emoji(DEFAULT_GLYPH.to_string())
    }
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::classify(raw))
    }
}
