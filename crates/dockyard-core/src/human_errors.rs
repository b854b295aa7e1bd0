// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every error is mapped to a plain message, a suggestion, and a presentation
// that tells the surface where to show it.

use crate::error::{DockyardError, FieldError};

/// How a surface should present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Next to the offending form field; the mutation was blocked.
    Inline,
    /// A notice the user has to dismiss.
    Blocking,
    /// Index drift or another programming error.
    Bug,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (heading or field hint).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub presentation: Presentation,
}

/// Message for a single form field.
pub fn field_message(field: &str, err: FieldError) -> String {
    match err {
        FieldError::EmptyField => format!("Please enter a {field}."),
        FieldError::InvalidUrl => "Enter a full address, like https://example.com".to_string(),
    }
}

/// Convert a `DockyardError` into a `HumanError`.
pub fn humanize_error(err: &DockyardError) -> HumanError {
    match err {
        DockyardError::Validation(errors) => {
            let mut hints = Vec::new();
            if let Some(e) = errors.name {
                hints.push(field_message("name", e));
            }
            if let Some(e) = errors.url {
                hints.push(field_message("URL", e));
            }
            HumanError {
                message: "Some fields need attention.".into(),
                suggestion: hints.join(" "),
                presentation: Presentation::Inline,
            }
        }

        DockyardError::DuplicateIdentity { id } => HumanError {
            message: "A service with this name already exists.".into(),
            suggestion: format!("Choose a different name (it would clash with '{id}')."),
            presentation: Presentation::Inline,
        },

        DockyardError::NotFound { .. } | DockyardError::UnknownService(_) => HumanError {
            message: "That service is no longer in the list.".into(),
            suggestion: "Reload the settings page and try again.".into(),
            presentation: Presentation::Bug,
        },

        DockyardError::InvalidPreference(detail) => HumanError {
            message: "That preference value isn't allowed.".into(),
            suggestion: detail.clone(),
            presentation: Presentation::Inline,
        },

        DockyardError::UnsupportedIcon(detail) => HumanError {
            message: "That file can't be used as an icon.".into(),
            suggestion: format!("Pick a PNG, JPEG, GIF, WebP, ICO or SVG image. ({detail})"),
            presentation: Presentation::Inline,
        },

        DockyardError::PersistenceFailure(detail) => HumanError {
            message: "Your changes could not be saved.".into(),
            suggestion: format!("They are shown here but may be lost on restart. ({detail})"),
            presentation: Presentation::Blocking,
        },

        DockyardError::ViewUnavailable(_) => HumanError {
            message: "This service was added after start-up.".into(),
            suggestion: "Restart Dockyard to open it.".into(),
            presentation: Presentation::Blocking,
        },

        DockyardError::Host(detail) => HumanError {
            message: "The shell could not complete that action.".into(),
            suggestion: detail.clone(),
            presentation: Presentation::Blocking,
        },

        DockyardError::Io(io_err) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check disk space and permissions. ({io_err})"),
            presentation: Presentation::Blocking,
        },

        DockyardError::Serialization(e) => HumanError {
            message: "Saved data is damaged.".into(),
            suggestion: format!("Defaults will be used. ({e})"),
            presentation: Presentation::Blocking,
        },
    }
}
