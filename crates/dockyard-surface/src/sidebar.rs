// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sidebar surface session.
//
// Holds the sidebar's snapshot of services, preferences and badges, plus the
// view-state tuple. Rendering is a projection of `items()`.

use dockyard_bridge::{HostBridge, PushMessage};
use dockyard_core::error::Result;
use dockyard_core::icon::ServiceIcon;
use dockyard_core::types::{BadgeCounts, Preferences, Service, ServiceId, ViewState};
use tracing::{debug, info};

/// Highest keyboard ordinal.
pub const MAX_SHORTCUT: usize = 9;

/// One rendered sidebar icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarItem {
    pub id: ServiceId,
    pub name: String,
    pub icon: ServiceIcon,
    pub badge: Option<u32>,
    pub active: bool,
    /// Ordinal of the keyboard shortcut, 1 to 9.
    pub shortcut: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct SidebarSession {
    services: Vec<Service>,
    preferences: Preferences,
    badges: BadgeCounts,
    view: ViewState,
}

impl SidebarSession {
    pub fn new(services: Vec<Service>, preferences: Preferences, badges: BadgeCounts) -> Self {
        Self {
            services,
            preferences,
            badges,
            view: ViewState::default(),
        }
    }

    /// Load the snapshot. Badge counts are pulled too, since pushes sent
    /// before this surface attached are gone.
    pub async fn load(host: &dyn HostBridge) -> Result<Self> {
        let services = host.list_services().await?;
        let preferences = host.get_preferences().await?;
        let badges = host.badge_counts().await?;
        debug!(count = services.len(), badges = badges.len(), "sidebar loaded");
        Ok(Self::new(services, preferences, badges))
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn badges(&self) -> &BadgeCounts {
        &self.badges
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Service to show at startup: the last active one if it still exists,
    /// else the first.
    pub fn initial_selection(&self, last_active: Option<&ServiceId>) -> Option<ServiceId> {
        last_active
            .filter(|id| self.contains(id))
            .or_else(|| self.services.first().map(|s| &s.id))
            .cloned()
    }

    /// Switch to the startup service. Returns the service shown, if any.
    pub async fn restore(&mut self, host: &dyn HostBridge) -> Result<Option<ServiceId>> {
        let last = host.last_active_service().await?;
        let Some(id) = self.initial_selection(last.as_ref()) else {
            return Ok(None);
        };
        self.select(host, id.clone()).await?;
        Ok(Some(id))
    }

    /// Ask the host to show `id`; mark it active once the host agreed.
    pub async fn select(&mut self, host: &dyn HostBridge, id: ServiceId) -> Result<()> {
        host.switch_service(id.clone()).await?;
        self.set_active(id);
        Ok(())
    }

    pub fn set_active(&mut self, id: ServiceId) {
        info!(%id, "service selected");
        self.view.active_service = Some(id);
        self.view.settings_open = false;
    }

    pub async fn open_settings(&mut self, host: &dyn HostBridge) -> Result<()> {
        host.open_settings().await?;
        self.set_settings_open();
        Ok(())
    }

    pub fn set_settings_open(&mut self) {
        self.view.active_service = None;
        self.view.settings_open = true;
    }

    /// Service bound to keyboard ordinal `n` (1-based, up to 9).
    pub fn shortcut_target(&self, n: usize) -> Option<&ServiceId> {
        if !(1..=MAX_SHORTCUT).contains(&n) {
            return None;
        }
        self.services.get(n - 1).map(|s| &s.id)
    }

    /// Apply a host push. Badge and service pushes replace the whole set.
    pub fn apply_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::Badges(badges) => {
                debug!(count = badges.len(), "badges replaced");
                self.badges = badges;
            }
            PushMessage::Preferences(preferences) => {
                debug!("preferences applied");
                self.preferences = preferences;
            }
            PushMessage::Services(services) => {
                debug!(count = services.len(), "service list replaced");
                self.services = services;
                if let Some(active) = &self.view.active_service
                    && !self.contains(active)
                {
                    self.view.active_service = None;
                }
            }
        }
    }

    pub fn items(&self) -> Vec<SidebarItem> {
        self.services
            .iter()
            .enumerate()
            .map(|(i, s)| SidebarItem {
                id: s.id.clone(),
                name: s.name.clone(),
                icon: s.icon.clone(),
                badge: self.badges.get(&s.id).copied().filter(|n| *n > 0),
                active: self.view.active_service.as_ref() == Some(&s.id),
                shortcut: (i < MAX_SHORTCUT).then_some(i + 1),
            })
            .collect()
    }

    fn contains(&self, id: &ServiceId) -> bool {
        self.services.iter().any(|s| &s.id == id)
    }
}
