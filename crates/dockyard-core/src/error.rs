// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Dockyard.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single form field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    /// The field was blank after trimming.
    EmptyField,
    /// The field is not an absolute URL.
    InvalidUrl,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField => f.write_str("must not be empty"),
            Self::InvalidUrl => f.write_str("is not a valid absolute URL"),
        }
    }
}

/// Per-field result of validating a service draft.
///
/// Both fields are checked in one pass so a form can show every error at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub name: Option<FieldError>,
    pub url: Option<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if let Some(e) = self.name {
            parts.push(format!("name {e}"));
        }
        if let Some(e) = self.url {
            parts.push(format!("url {e}"));
        }
        f.write_str(&parts.join("; "))
    }
}

/// Top-level error type for all Dockyard operations.
#[derive(Debug, Error)]
pub enum DockyardError {
    // -- Form / registry errors --
    #[error("invalid service: {0}")]
    Validation(ValidationErrors),

    #[error("a service with id '{id}' already exists")]
    DuplicateIdentity { id: String },

    #[error("no service at index {index} (list has {len})")]
    NotFound { index: usize, len: usize },

    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("invalid preference: {0}")]
    InvalidPreference(String),

    #[error("unsupported icon image: {0}")]
    UnsupportedIcon(String),

    // -- Host / bridge --
    #[error("persistence failed: {0}")]
    PersistenceFailure(String),

    #[error("service '{0}' requires a restart to be available")]
    ViewUnavailable(String),

    #[error("host error: {0}")]
    Host(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DockyardError {
    /// Wrap any host-side failure of a save call as a persistence failure.
    pub fn into_persistence(self) -> Self {
        match self {
            Self::PersistenceFailure(_) => self,
            other => Self::PersistenceFailure(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for DockyardError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DockyardError>;
