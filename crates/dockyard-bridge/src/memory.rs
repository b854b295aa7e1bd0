// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory host for tests and headless runs.
//
// Holds the canonical state in a mutex, records every pull call, and can be
// told to reject saves so surfaces can exercise their failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use dockyard_core::error::{DockyardError, Result};
use dockyard_core::types::{BadgeCounts, Preferences, Service, ServiceId};
use tracing::{debug, warn};

use crate::push::{PushHub, PushMessage, SurfaceKind};
use crate::traits::{BridgeFuture, HostBridge};

/// A pull call as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ListServices,
    SaveServices(Vec<ServiceId>),
    GetPreferences,
    SavePreferences,
    SwitchService(ServiceId),
    OpenSettings,
    LastActiveService,
    ReloadService(ServiceId),
    ServiceUrl(ServiceId),
    BadgeCounts,
    ContextMenu(ServiceId),
    Restart,
}

#[derive(Debug, Default)]
struct MemoryState {
    services: Vec<Service>,
    preferences: Preferences,
    badges: BadgeCounts,
    active: Option<ServiceId>,
    last_active: Option<ServiceId>,
    calls: Vec<HostCall>,
}

/// Host whose state lives only in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryState>>,
    fail_saves: Arc<AtomicBool>,
    push: PushHub,
}

impl MemoryHost {
    pub fn new(services: Vec<Service>) -> Self {
        let host = Self::default();
        host.with_state(|s| s.services = services);
        host
    }

    /// Make every subsequent save (services or preferences) fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn push_hub(&self) -> &PushHub {
        &self.push
    }

    /// Replace the badge set and push it to the sidebar.
    pub fn set_badges(&self, badges: BadgeCounts) {
        self.with_state(|s| s.badges = badges.clone());
        self.push.push(SurfaceKind::Sidebar, PushMessage::Badges(badges));
    }

    pub fn set_last_active(&self, id: Option<ServiceId>) {
        self.with_state(|s| s.last_active = id);
    }

    pub fn services(&self) -> Vec<Service> {
        self.with_state(|s| s.services.clone())
    }

    pub fn preferences(&self) -> Preferences {
        self.with_state(|s| s.preferences.clone())
    }

    pub fn active(&self) -> Option<ServiceId> {
        self.with_state(|s| s.active.clone())
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// Number of `save_services` calls received, failed ones included.
    pub fn save_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, HostCall::SaveServices(_)))
            .count()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        match self.state.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn record(&self, call: HostCall) {
        self.with_state(|s| s.calls.push(call));
    }

    fn check_save(&self) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            warn!("memory host rejecting save");
            return Err(DockyardError::PersistenceFailure("host rejected the save".into()));
        }
        Ok(())
    }

    fn find(&self, id: &ServiceId) -> Option<Service> {
        self.with_state(|s| s.services.iter().find(|svc| &svc.id == id).cloned())
    }
}

impl HostBridge for MemoryHost {
    fn list_services(&self) -> BridgeFuture<'_, Vec<Service>> {
        Box::pin(async move {
            self.record(HostCall::ListServices);
            Ok(self.services())
        })
    }

    fn save_services(&self, services: Vec<Service>) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.record(HostCall::SaveServices(services.iter().map(|s| s.id.clone()).collect()));
            self.check_save()?;
            debug!(count = services.len(), "memory host saved services");
            self.with_state(|s| s.services = services.clone());
            self.push.push(SurfaceKind::Sidebar, PushMessage::Services(services));
            Ok(())
        })
    }

    fn get_preferences(&self) -> BridgeFuture<'_, Preferences> {
        Box::pin(async move {
            self.record(HostCall::GetPreferences);
            Ok(self.preferences())
        })
    }

    fn save_preferences(&self, preferences: Preferences) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.record(HostCall::SavePreferences);
            self.check_save()?;
            self.with_state(|s| s.preferences = preferences.clone());
            self.push.push(SurfaceKind::Sidebar, PushMessage::Preferences(preferences));
            Ok(())
        })
    }

    fn switch_service(&self, id: ServiceId) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.record(HostCall::SwitchService(id.clone()));
            if self.find(&id).is_none() {
                return Err(DockyardError::UnknownService(id.to_string()));
            }
            self.with_state(|s| {
                s.active = Some(id.clone());
                s.last_active = Some(id);
            });
            Ok(())
        })
    }

    fn open_settings(&self) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.record(HostCall::OpenSettings);
            self.with_state(|s| s.active = None);
            Ok(())
        })
    }

    fn last_active_service(&self) -> BridgeFuture<'_, Option<ServiceId>> {
        Box::pin(async move {
            self.record(HostCall::LastActiveService);
            Ok(self.with_state(|s| s.last_active.clone()))
        })
    }

    fn reload_service(&self, id: ServiceId) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.record(HostCall::ReloadService(id.clone()));
            match self.find(&id) {
                Some(_) => Ok(()),
                None => Err(DockyardError::UnknownService(id.to_string())),
            }
        })
    }

    fn service_url(&self, id: ServiceId) -> BridgeFuture<'_, Option<String>> {
        Box::pin(async move {
            self.record(HostCall::ServiceUrl(id.clone()));
            Ok(self.find(&id).map(|s| s.url))
        })
    }

    fn badge_counts(&self) -> BridgeFuture<'_, BadgeCounts> {
        Box::pin(async move {
            self.record(HostCall::BadgeCounts);
            Ok(self.with_state(|s| s.badges.clone()))
        })
    }

    fn show_context_menu(&self, id: ServiceId) {
        self.record(HostCall::ContextMenu(id));
    }

    fn restart(&self) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.record(HostCall::Restart);
            Err(DockyardError::Host("the memory host cannot restart".into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_core::icon::ServiceIcon;

    fn service(id: &str) -> Service {
        Service {
            id: ServiceId::new(id),
            name: id.to_uppercase(),
            url: format!("https://{id}.test"),
            icon: ServiceIcon::default(),
        }
    }

    #[tokio::test]
    async fn save_then_list_round_trips() {
        let host = MemoryHost::default();
        host.save_services(vec![service("a"), service("b")]).await.unwrap();
        let listed = host.list_services().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(host.save_count(), 1);
    }

    #[tokio::test]
    async fn saved_list_is_pushed_to_sidebar() {
        let host = MemoryHost::new(vec![service("a"), service("b")]);
        let mut rx = host.push_hub().attach(SurfaceKind::Sidebar);
        host.save_services(vec![service("b"), service("a")]).await.unwrap();
        assert_eq!(
            rx.try_recv(),
            Some(PushMessage::Services(vec![service("b"), service("a")]))
        );
    }

    #[tokio::test]
    async fn rejected_save_keeps_host_state() {
        let host = MemoryHost::new(vec![service("a")]);
        let mut rx = host.push_hub().attach(SurfaceKind::Sidebar);
        host.fail_saves(true);
        let err = host.save_services(vec![]).await.unwrap_err();
        assert!(matches!(err, DockyardError::PersistenceFailure(_)));
        assert_eq!(host.services().len(), 1);
        assert_eq!(rx.try_recv(), None);
    }

    #[tokio::test]
    async fn switch_records_last_active() {
        let host = MemoryHost::new(vec![service("a")]);
        host.switch_service(ServiceId::new("a")).await.unwrap();
        assert_eq!(host.last_active_service().await.unwrap(), Some(ServiceId::new("a")));
        assert!(host.switch_service(ServiceId::new("zz")).await.is_err());
    }

    #[tokio::test]
    async fn saved_preferences_are_pushed_to_sidebar() {
        let host = MemoryHost::default();
        let mut rx = host.push_hub().attach(SurfaceKind::Sidebar);
        let prefs = Preferences {
            icon_size: 32,
            ..Preferences::default()
        };
        host.save_preferences(prefs.clone()).await.unwrap();
        assert_eq!(rx.try_recv(), Some(PushMessage::Preferences(prefs)));
    }
}
