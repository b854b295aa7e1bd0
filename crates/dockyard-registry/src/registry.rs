// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory ordered service list.
//
// The registry owns one surface's copy of the list loaded from the host. It
// enforces the field and identity invariants on every mutation and hands
// back the full new list so the caller can submit it for persistence.
// Order is the only ranking signal: sidebar order, keyboard ordinals and the
// settings list all follow it.

use std::collections::HashSet;

use dockyard_core::error::{DockyardError, Result};
use dockyard_core::icon::ServiceIcon;
use dockyard_core::types::{Service, ServiceDraft, ServiceId};
use tracing::{debug, info, warn};

use crate::reorder::{self, ReorderRequest};
use crate::validator::validate;

/// Result of a successful mutation: the list before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub previous: Vec<Service>,
    pub current: Vec<Service>,
}

/// One surface's ordered list of services.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<Service>,
}

impl ServiceRegistry {
    /// Build a registry from a host snapshot.
    ///
    /// Entries whose id repeats an earlier one are dropped so the identity
    /// invariant holds from the start.
    pub fn from_services(services: Vec<Service>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(services.len());
        for service in services {
            if seen.insert(service.id.clone()) {
                kept.push(service);
            } else {
                warn!(id = %service.id, "dropping duplicate service from host snapshot");
            }
        }
        Self { services: kept }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Service> {
        self.services.get(index).ok_or(DockyardError::NotFound {
            index,
            len: self.services.len(),
        })
    }

    pub fn position(&self, id: &ServiceId) -> Option<usize> {
        self.services.iter().position(|s| &s.id == id)
    }

    /// Validate a draft and append it to the end of the list.
    pub fn create(&mut self, draft: &ServiceDraft) -> Result<Mutation> {
        let valid = validate(draft)?;
        let id = ServiceId::from_name(&valid.name);
        self.ensure_unique(&id, None)?;

        let icon = ServiceIcon::resolve_for_save(valid.icon_image.as_deref(), valid.icon_text.as_deref());
        let previous = self.services.clone();
        info!(%id, name = %valid.name, "service created");
        self.services.push(Service {
            id,
            name: valid.name,
            url: valid.url,
            icon,
        });
        Ok(self.mutation(previous))
    }

    /// Replace the fields of the entry at `index`.
    ///
    /// The entry keeps its stored id and its position. The id derived from
    /// the new name must not collide with any other entry.
    pub fn update(&mut self, index: usize, draft: &ServiceDraft) -> Result<Mutation> {
        self.get(index)?;
        let valid = validate(draft)?;
        let derived = ServiceId::from_name(&valid.name);
        self.ensure_unique(&derived, Some(index))?;

        let icon = ServiceIcon::resolve_for_save(valid.icon_image.as_deref(), valid.icon_text.as_deref());
        let previous = self.services.clone();
        let entry = &mut self.services[index];
        entry.name = valid.name;
        entry.url = valid.url;
        entry.icon = icon;
        info!(id = %entry.id, index, "service updated");
        Ok(self.mutation(previous))
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn delete(&mut self, index: usize) -> Result<Mutation> {
        self.get(index)?;
        let previous = self.services.clone();
        let removed = self.services.remove(index);
        info!(id = %removed.id, index, "service deleted");
        Ok(self.mutation(previous))
    }

    /// Apply a drag gesture. `Ok(None)` means the order did not change and
    /// nothing needs persisting.
    pub fn reorder(&mut self, request: ReorderRequest) -> Result<Option<Mutation>> {
        let previous = self.services.clone();
        if !reorder::apply(&mut self.services, request)? {
            return Ok(None);
        }
        debug!(?request, "services reordered");
        Ok(Some(self.mutation(previous)))
    }

    /// Replace the whole list, e.g. when rolling back a failed save.
    pub fn replace_all(&mut self, services: Vec<Service>) {
        *self = Self::from_services(services);
    }

    fn ensure_unique(&self, id: &ServiceId, editing: Option<usize>) -> Result<()> {
        let clash = self
            .services
            .iter()
            .enumerate()
            .any(|(i, s)| Some(i) != editing && &s.id == id);
        if clash {
            warn!(%id, "rejecting duplicate service id");
            return Err(DockyardError::DuplicateIdentity { id: id.to_string() });
        }
        Ok(())
    }

    fn mutation(&self, previous: Vec<Service>) -> Mutation {
        Mutation {
            previous,
            current: self.services.clone(),
        }
    }
}
