// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The desktop host: owner of the canonical service list.
//
// Surfaces reach it through `HostBridge` and hear back through the push hub.
// The host owns persistence, badge counts and content-view bookkeeping; it
// drives the real views through a `ViewCommand` channel held by the shell.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use dockyard_bridge::{BridgeFuture, HostBridge, PushHub, PushMessage, SurfaceKind};
use dockyard_core::error::{DockyardError, Result};
use dockyard_core::types::{BadgeCounts, Preferences, Service, ServiceId, SessionState, ViewState};
use dockyard_core::AppConfig;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};

use crate::badges::{self, BadgeBoard};
use crate::data_dir;
use crate::notify::Notifier;
use crate::store::{self, Store};
use crate::views::{ViewCommand, ViewTracker};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct DesktopHost {
    store: Store,
    config: AppConfig,
    services: Mutex<Vec<Service>>,
    preferences: Mutex<Preferences>,
    session: Mutex<SessionState>,
    views: Mutex<ViewTracker>,
    badges: Mutex<BadgeBoard>,
    push: PushHub,
    commands: UnboundedSender<ViewCommand>,
    notifier: Arc<dyn Notifier>,
}

impl DesktopHost {
    /// Resolve the data directory, load `config.json` and all state, and
    /// create one view per known service. Call once at startup.
    pub fn open(notifier: Arc<dyn Notifier>) -> Result<(Self, UnboundedReceiver<ViewCommand>)> {
        let config = store::load_config(&data_dir::base_dir());
        let dir = data_dir::data_dir(&config);
        info!(path = %dir.display(), "opening host data directory");
        Self::with_store(Store::new(dir), config, notifier)
    }

    pub fn with_store(
        store: Store,
        config: AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<(Self, UnboundedReceiver<ViewCommand>)> {
        let services = store.load_services()?;
        let preferences = store.load_preferences();
        let session = store.load_state();
        let views = ViewTracker::new(services.iter().map(|s| &s.id));
        let (commands, rx) = mpsc::unbounded_channel();

        info!(services = services.len(), "host initialised");
        let host = Self {
            store,
            config,
            services: Mutex::new(services),
            preferences: Mutex::new(preferences),
            session: Mutex::new(session),
            views: Mutex::new(views),
            badges: Mutex::new(BadgeBoard::new()),
            push: PushHub::new(),
            commands,
            notifier,
        };
        Ok((host, rx))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Hub that surfaces attach to for pushes.
    pub fn push_hub(&self) -> &PushHub {
        &self.push
    }

    /// Snapshot of what the main area shows.
    pub fn view_state(&self) -> ViewState {
        lock(&self.views).state().clone()
    }

    /// React to a content view's document title changing.
    #[instrument(skip(self, id), fields(service = %id))]
    pub fn handle_title_change(&self, id: &ServiceId, title: &str) {
        if badges::is_placeholder_title(title) {
            return;
        }
        let Some(service) = self.find(id) else {
            debug!("title change for unknown service");
            return;
        };

        let count = badges::extract_badge_count(title);
        let (change, snapshot) = {
            let mut board = lock(&self.badges);
            let change = board.observe(id, count);
            (change, board.snapshot())
        };
        debug!(count, previous = change.previous, "badge observed");

        let notifications_enabled = lock(&self.preferences).notifications_enabled;
        if notifications_enabled
            && let Some(body) = badges::notification_body(&service.name, change)
        {
            self.notifier.notify(&service.name, &body);
        }

        self.push.push(SurfaceKind::Sidebar, PushMessage::Badges(snapshot));
    }

    /// Blank idle background views once.
    pub fn hibernate_idle(&self, now: Instant) -> Vec<ServiceId> {
        let idle = Duration::from_secs(self.config.hibernation_after_secs);
        let hibernated = lock(&self.views).hibernate_idle(now, idle);
        for id in &hibernated {
            self.send(ViewCommand::Blank { id: id.clone() });
        }
        hibernated
    }

    /// Periodic hibernation sweep. Runs until the task is dropped.
    pub async fn run_hibernation(self: Arc<Self>) {
        let period = Duration::from_secs(self.config.hibernation_check_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.hibernate_idle(Instant::now());
        }
    }

    fn find(&self, id: &ServiceId) -> Option<Service> {
        lock(&self.services).iter().find(|s| &s.id == id).cloned()
    }

    fn require(&self, id: &ServiceId) -> Result<Service> {
        self.find(id)
            .ok_or_else(|| DockyardError::UnknownService(id.to_string()))
    }

    fn send(&self, command: ViewCommand) {
        if self.commands.send(command).is_err() {
            warn!("view shell gone, command dropped");
        }
    }

    fn apply_saved_services(&self, services: Vec<Service>) {
        let ids: Vec<ServiceId> = services.iter().map(|s| s.id.clone()).collect();
        *lock(&self.services) = services.clone();
        // The sidebar mirrors order, names and icons, so every save reaches it.
        self.push.push(SurfaceKind::Sidebar, PushMessage::Services(services));

        let reconciliation = lock(&self.views).apply_service_changes(&ids);
        if !reconciliation.removed.is_empty() {
            let snapshot = {
                let mut board = lock(&self.badges);
                for id in &reconciliation.removed {
                    board.remove(id);
                }
                board.snapshot()
            };
            for id in &reconciliation.removed {
                self.send(ViewCommand::Blank { id: id.clone() });
            }
            self.push.push(SurfaceKind::Sidebar, PushMessage::Badges(snapshot));
        }
        if reconciliation.restart_required() {
            info!(missing = ?reconciliation.missing_views, "new services added, restart required");
        }
    }
}

impl HostBridge for DesktopHost {
    fn list_services(&self) -> BridgeFuture<'_, Vec<Service>> {
        Box::pin(async move { Ok(lock(&self.services).clone()) })
    }

    fn save_services(&self, services: Vec<Service>) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            self.store
                .save_services(&services)
                .map_err(DockyardError::into_persistence)?;
            info!(count = services.len(), "service list saved");
            self.apply_saved_services(services);
            Ok(())
        })
    }

    fn get_preferences(&self) -> BridgeFuture<'_, Preferences> {
        Box::pin(async move { Ok(lock(&self.preferences).clone()) })
    }

    fn save_preferences(&self, preferences: Preferences) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            preferences.validate()?;
            self.store
                .save_preferences(&preferences)
                .map_err(DockyardError::into_persistence)?;
            *lock(&self.preferences) = preferences.clone();
            info!("preferences saved");
            self.push
                .push(SurfaceKind::Sidebar, PushMessage::Preferences(preferences));
            Ok(())
        })
    }

    fn switch_service(&self, id: ServiceId) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            let service = self.require(&id)?;
            let outcome = lock(&self.views).switch(&id, Instant::now())?;
            if outcome.needs_navigation {
                self.send(ViewCommand::Navigate {
                    id: id.clone(),
                    url: service.url,
                });
            }
            self.send(ViewCommand::Show { id: id.clone() });

            let state = {
                let mut session = lock(&self.session);
                session.last_active_service = Some(id);
                session.clone()
            };
            // Losing the last-active marker only affects the next startup.
            if let Err(e) = self.store.save_state(&state) {
                warn!("failed to persist last active service: {e}");
            }
            Ok(())
        })
    }

    fn open_settings(&self) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            lock(&self.views).show_settings();
            self.send(ViewCommand::ShowSettings);
            Ok(())
        })
    }

    fn last_active_service(&self) -> BridgeFuture<'_, Option<ServiceId>> {
        Box::pin(async move { Ok(lock(&self.session).last_active_service.clone()) })
    }

    fn reload_service(&self, id: ServiceId) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            let service = self.require(&id)?;
            lock(&self.views).reload(&id, Instant::now())?;
            debug!(%id, "reloading service");
            self.send(ViewCommand::Navigate { id, url: service.url });
            Ok(())
        })
    }

    fn service_url(&self, id: ServiceId) -> BridgeFuture<'_, Option<String>> {
        Box::pin(async move { Ok(self.find(&id).map(|s| s.url)) })
    }

    fn badge_counts(&self) -> BridgeFuture<'_, BadgeCounts> {
        Box::pin(async move { Ok(lock(&self.badges).snapshot()) })
    }

    fn show_context_menu(&self, id: ServiceId) {
        self.send(ViewCommand::ContextMenu { id });
    }

    fn restart(&self) -> BridgeFuture<'_, ()> {
        Box::pin(async move {
            info!("restart requested");
            self.commands
                .send(ViewCommand::Restart)
                .map_err(|_| DockyardError::Host("view shell is not running".into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{LogNotifier, RecordingNotifier};
    use dockyard_core::ServiceIcon;

    struct Fixture {
        _tmp: tempfile::TempDir,
        host: DesktopHost,
        commands: UnboundedReceiver<ViewCommand>,
        notifier: RecordingNotifier,
    }

    fn service(id: &str) -> Service {
        Service {
            id: ServiceId::new(id),
            name: id.to_uppercase(),
            url: format!("https://{id}.test"),
            icon: ServiceIcon::default(),
        }
    }

    fn fixture(ids: &[&str]) -> Fixture {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Store::new(tmp.path());
        let services: Vec<Service> = ids.iter().map(|id| service(id)).collect();
        store.save_services(&services).expect("seed services");
        let notifier = RecordingNotifier::default();
        let (host, commands) =
            DesktopHost::with_store(store, AppConfig::default(), Arc::new(notifier.clone()))
                .expect("host");
        Fixture {
            _tmp: tmp,
            host,
            commands,
            notifier,
        }
    }

    fn drain(rx: &mut UnboundedReceiver<ViewCommand>) -> Vec<ViewCommand> {
        let mut out = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            out.push(cmd);
        }
        out
    }

    fn id(s: &str) -> ServiceId {
        ServiceId::new(s)
    }

    #[tokio::test]
    async fn first_switch_navigates_lazily() {
        let mut f = fixture(&["a", "b"]);
        f.host.switch_service(id("a")).await.expect("switch");
        assert_eq!(
            drain(&mut f.commands),
            [
                ViewCommand::Navigate { id: id("a"), url: "https://a.test".into() },
                ViewCommand::Show { id: id("a") },
            ]
        );

        f.host.switch_service(id("a")).await.expect("switch again");
        assert_eq!(drain(&mut f.commands), [ViewCommand::Show { id: id("a") }]);
        assert_eq!(f.host.last_active_service().await.unwrap(), Some(id("a")));
    }

    #[tokio::test]
    async fn last_active_survives_restart() {
        let f = fixture(&["a", "b"]);
        f.host.switch_service(id("b")).await.expect("switch");
        let store = Store::new(f._tmp.path());
        let (reopened, _rx) =
            DesktopHost::with_store(store, AppConfig::default(), Arc::new(LogNotifier)).expect("reopen");
        assert_eq!(reopened.last_active_service().await.unwrap(), Some(id("b")));
    }

    #[tokio::test]
    async fn switch_to_unknown_service_fails() {
        let f = fixture(&["a"]);
        let err = f.host.switch_service(id("zz")).await.unwrap_err();
        assert!(matches!(err, DockyardError::UnknownService(_)));
    }

    #[tokio::test]
    async fn service_added_after_startup_needs_restart() {
        let f = fixture(&["a"]);
        f.host
            .save_services(vec![service("a"), service("new")])
            .await
            .expect("save");
        let err = f.host.switch_service(id("new")).await.unwrap_err();
        assert!(matches!(err, DockyardError::ViewUnavailable(_)));
    }

    #[tokio::test]
    async fn open_settings_clears_active() {
        let mut f = fixture(&["a"]);
        f.host.switch_service(id("a")).await.unwrap();
        f.host.open_settings().await.unwrap();
        let state = f.host.view_state();
        assert_eq!(state.active_service, None);
        assert!(state.settings_open);
        assert_eq!(drain(&mut f.commands).last(), Some(&ViewCommand::ShowSettings));
    }

    #[tokio::test]
    async fn title_change_updates_badges_and_notifies() {
        let f = fixture(&["a", "b"]);
        let mut sidebar = f.host.push_hub().attach(SurfaceKind::Sidebar);

        f.host.handle_title_change(&id("a"), "Inbox (3)");
        let expected: BadgeCounts = [(id("a"), 3)].into_iter().collect();
        assert_eq!(sidebar.try_recv(), Some(PushMessage::Badges(expected.clone())));
        assert_eq!(f.host.badge_counts().await.unwrap(), expected);

        f.host.handle_title_change(&id("a"), "Inbox (5)");
        f.host.handle_title_change(&id("a"), "Inbox");
        assert_eq!(
            f.notifier.sent(),
            [
                ("A".to_string(), "3 notifications from A".to_string()),
                ("A".to_string(), "2 new notifications from A".to_string()),
            ]
        );
        assert!(f.host.badge_counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn placeholder_titles_are_ignored() {
        let f = fixture(&["a"]);
        let mut sidebar = f.host.push_hub().attach(SurfaceKind::Sidebar);
        f.host.handle_title_change(&id("a"), "about:blank");
        f.host.handle_title_change(&id("a"), "");
        assert_eq!(sidebar.try_recv(), None);
    }

    #[tokio::test]
    async fn notifications_respect_preference() {
        let f = fixture(&["a"]);
        let prefs = Preferences {
            notifications_enabled: false,
            ..Preferences::default()
        };
        f.host.save_preferences(prefs).await.expect("save prefs");
        f.host.handle_title_change(&id("a"), "(2)");
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn removing_a_service_drops_its_badge_and_view() {
        let mut f = fixture(&["a", "b"]);
        f.host.switch_service(id("a")).await.unwrap();
        f.host.handle_title_change(&id("a"), "(2)");
        f.host.handle_title_change(&id("b"), "(1)");
        drain(&mut f.commands);
        let mut sidebar = f.host.push_hub().attach(SurfaceKind::Sidebar);

        f.host.save_services(vec![service("b")]).await.expect("save");

        assert_eq!(sidebar.try_recv(), Some(PushMessage::Services(vec![service("b")])));
        let expected: BadgeCounts = [(id("b"), 1)].into_iter().collect();
        assert_eq!(sidebar.try_recv(), Some(PushMessage::Badges(expected)));
        assert_eq!(drain(&mut f.commands), [ViewCommand::Blank { id: id("a") }]);
        assert_eq!(f.host.view_state().active_service, None);
        assert_eq!(f.host.list_services().await.unwrap(), [service("b")]);
    }

    #[tokio::test]
    async fn every_saved_list_reaches_the_sidebar() {
        let f = fixture(&["a", "b", "c"]);
        let mut sidebar = f.host.push_hub().attach(SurfaceKind::Sidebar);

        let reordered = vec![service("c"), service("a"), service("b")];
        f.host.save_services(reordered.clone()).await.expect("reorder save");
        assert_eq!(sidebar.try_recv(), Some(PushMessage::Services(reordered)));

        let mut grown = vec![service("c"), service("a"), service("b"), service("d")];
        grown[1].name = "Alpha".into();
        f.host.save_services(grown.clone()).await.expect("add save");
        assert_eq!(sidebar.try_recv(), Some(PushMessage::Services(grown)));
        assert_eq!(sidebar.try_recv(), None);
    }

    #[tokio::test]
    async fn failed_save_is_a_persistence_failure() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let good = Store::new(tmp.path().join("data"));
        good.save_services(&[service("a")]).expect("seed");
        let (host, _rx) =
            DesktopHost::with_store(good, AppConfig::default(), Arc::new(LogNotifier)).expect("host");

        // Replace the data directory with a file so the next write fails.
        std::fs::remove_dir_all(tmp.path().join("data")).expect("rm");
        std::fs::write(tmp.path().join("data"), "x").expect("block");

        let err = host.save_services(vec![]).await.unwrap_err();
        assert!(matches!(err, DockyardError::PersistenceFailure(_)));
        assert_eq!(host.list_services().await.unwrap(), [service("a")]);
    }

    #[tokio::test]
    async fn invalid_preferences_are_rejected() {
        let f = fixture(&["a"]);
        let prefs = Preferences {
            icon_size: 100,
            ..Preferences::default()
        };
        let err = f.host.save_preferences(prefs).await.unwrap_err();
        assert!(matches!(err, DockyardError::InvalidPreference(_)));
        assert_eq!(f.host.get_preferences().await.unwrap(), Preferences::default());
    }

    #[tokio::test]
    async fn reload_renavigates() {
        let mut f = fixture(&["a"]);
        f.host.reload_service(id("a")).await.unwrap();
        assert_eq!(
            drain(&mut f.commands),
            [ViewCommand::Navigate { id: id("a"), url: "https://a.test".into() }]
        );
        assert_eq!(f.host.service_url(id("a")).await.unwrap().as_deref(), Some("https://a.test"));
        assert_eq!(f.host.service_url(id("zz")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn hibernation_blanks_idle_background_views() {
        let mut f = fixture(&["a", "b"]);
        f.host.switch_service(id("a")).await.unwrap();
        f.host.switch_service(id("b")).await.unwrap();
        drain(&mut f.commands);

        let later = Instant::now() + Duration::from_secs(f.host.config().hibernation_after_secs + 1);
        assert_eq!(f.host.hibernate_idle(later), [id("a")]);
        assert_eq!(drain(&mut f.commands), [ViewCommand::Blank { id: id("a") }]);
    }

    #[tokio::test]
    async fn context_menu_and_restart_become_commands() {
        let mut f = fixture(&["a"]);
        f.host.show_context_menu(id("a"));
        f.host.restart().await.expect("restart");
        assert_eq!(
            drain(&mut f.commands),
            [ViewCommand::ContextMenu { id: id("a") }, ViewCommand::Restart]
        );
    }

    #[tokio::test]
    async fn restart_without_shell_fails() {
        let f = fixture(&["a"]);
        drop(f.commands);
        assert!(matches!(f.host.restart().await, Err(DockyardError::Host(_))));
    }
}
