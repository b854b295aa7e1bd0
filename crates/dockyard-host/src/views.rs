// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-view bookkeeping.
//
// The host does not render service content itself. It tracks which views
// exist, which have been navigated to their URL, when each was last shown,
// and what the main area displays, then emits `ViewCommand`s for the
// embedding shell to carry out.
//
// Views are created once at startup for every known service and start
// blank. A service added later has no view until the process restarts.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use dockyard_core::error::{DockyardError, Result};
use dockyard_core::types::{ServiceId, ViewState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Instruction for the shell that owns the real content views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewCommand {
    /// Bring the view of `id` to the front.
    Show { id: ServiceId },
    /// Load `url` into the view of `id`.
    Navigate { id: ServiceId, url: String },
    /// Unload the view of `id` (hibernation or removal).
    Blank { id: ServiceId },
    /// Show the settings surface in the content area.
    ShowSettings,
    /// Open the native context menu for `id`.
    ContextMenu { id: ServiceId },
    /// Restart the whole process.
    Restart,
}

/// What a switch requires of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// The view is still blank and must be navigated first.
    pub needs_navigation: bool,
}

/// Result of applying a saved service list to the existing views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Ids whose views were torn down.
    pub removed: Vec<ServiceId>,
    /// Ids in the new list with no view; they need a restart.
    pub missing_views: Vec<ServiceId>,
}

impl Reconciliation {
    pub fn restart_required(&self) -> bool {
        !self.missing_views.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewTracker {
    created: Vec<ServiceId>,
    navigated: HashSet<ServiceId>,
    last_activity: HashMap<ServiceId, Instant>,
    state: ViewState,
}

impl ViewTracker {
    /// One blank view per service known at startup.
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a ServiceId>) -> Self {
        Self {
            created: ids.into_iter().cloned().collect(),
            ..Self::default()
        }
    }

    pub fn has_view(&self, id: &ServiceId) -> bool {
        self.created.contains(id)
    }

    pub fn is_navigated(&self, id: &ServiceId) -> bool {
        self.navigated.contains(id)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn active(&self) -> Option<&ServiceId> {
        self.state.active_service.as_ref()
    }

    /// Make `id` the active view.
    pub fn switch(&mut self, id: &ServiceId, now: Instant) -> Result<SwitchOutcome> {
        self.ensure_view(id)?;
        let needs_navigation = self.navigated.insert(id.clone());
        self.last_activity.insert(id.clone(), now);
        self.state.active_service = Some(id.clone());
        self.state.settings_open = false;
        debug!(%id, needs_navigation, "switched view");
        Ok(SwitchOutcome { needs_navigation })
    }

    pub fn show_settings(&mut self) {
        self.state.active_service = None;
        self.state.settings_open = true;
    }

    /// Record a reload of `id`; its view is navigated afterwards.
    pub fn reload(&mut self, id: &ServiceId, now: Instant) -> Result<()> {
        self.ensure_view(id)?;
        self.navigated.insert(id.clone());
        self.last_activity.insert(id.clone(), now);
        Ok(())
    }

    /// Blank every navigated, inactive view idle for longer than `idle`.
    /// The returned views reload lazily on their next switch.
    pub fn hibernate_idle(&mut self, now: Instant, idle: Duration) -> Vec<ServiceId> {
        let active = self.state.active_service.clone();
        let mut hibernated: Vec<ServiceId> = self
            .navigated
            .iter()
            .filter(|id| active.as_ref() != Some(*id))
            .filter(|id| {
                self.last_activity
                    .get(*id)
                    .is_some_and(|last| now.saturating_duration_since(*last) > idle)
            })
            .cloned()
            .collect();
        hibernated.sort();

        for id in &hibernated {
            self.navigated.remove(id);
            self.last_activity.remove(id);
            info!(%id, "hibernating view");
        }
        hibernated
    }

    /// Apply a saved list: tear down views of removed services and report
    /// services that have none.
    pub fn apply_service_changes(&mut self, ids: &[ServiceId]) -> Reconciliation {
        let wanted: HashSet<&ServiceId> = ids.iter().collect();
        let removed: Vec<ServiceId> = self
            .created
            .iter()
            .filter(|id| !wanted.contains(id))
            .cloned()
            .collect();

        for id in &removed {
            info!(%id, "removing view");
            self.navigated.remove(id);
            self.last_activity.remove(id);
        }
        self.created.retain(|id| wanted.contains(id));

        if let Some(active) = &self.state.active_service
            && !wanted.contains(active)
        {
            self.state.active_service = None;
        }

        let missing_views = ids.iter().filter(|id| !self.has_view(id)).cloned().collect();
        Reconciliation {
            removed,
            missing_views,
        }
    }

    fn ensure_view(&self, id: &ServiceId) -> Result<()> {
        if self.has_view(id) {
            Ok(())
        } else {
            Err(DockyardError::ViewUnavailable(id.to_string()))
        }
    }
}
