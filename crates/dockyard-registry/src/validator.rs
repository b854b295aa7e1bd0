// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service draft validation.
//
// Both fields are always checked so the form can render every error at once.
// Duplicate ids are a registry policy and are not checked here.

use dockyard_core::error::{FieldError, ValidationErrors};
use dockyard_core::types::ServiceDraft;
use url::Url;

/// A draft whose name and URL passed validation, with both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub name: String,
    pub url: String,
    pub icon_text: Option<String>,
    pub icon_image: Option<String>,
}

/// Validate a draft's name and URL.
pub fn validate(draft: &ServiceDraft) -> Result<ValidDraft, ValidationErrors> {
    let name = draft.name.trim();
    let url = draft.url.trim();

    let errors = ValidationErrors {
        name: check_name(name),
        url: check_url(url),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidDraft {
        name: name.to_string(),
        url: url.to_string(),
        icon_text: draft.icon_text.clone(),
        icon_image: draft.icon_image.clone(),
    })
}

fn check_name(name: &str) -> Option<FieldError> {
    name.is_empty().then_some(FieldError::EmptyField)
}

fn check_url(url: &str) -> Option<FieldError> {
    if url.is_empty() {
        return Some(FieldError::EmptyField);
    }
    // `Url::parse` only accepts absolute URLs; relative input fails with
    // `RelativeUrlWithoutBase`.
    match Url::parse(url) {
        Ok(_) => None,
        Err(_) => Some(FieldError::InvalidUrl),
    }
}
