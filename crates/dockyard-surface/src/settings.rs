// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings surface session.
//
// Mutations run synchronously against the local registry and hand back a
// `PersistRequest`. The caller submits it with `persist` (which borrows
// nothing from the session, so several saves may be in flight) and feeds
// the outcome to `settle`, which applies the configured `PersistPolicy`.

use dockyard_bridge::HostBridge;
use dockyard_core::config::PersistPolicy;
use dockyard_core::error::{DockyardError, Result};
use dockyard_core::types::{Service, ServiceDraft, ServiceId};
use dockyard_registry::{DragSession, Mutation, ReorderRequest, ServiceRegistry};
use tracing::{debug, info, warn};

/// What the service form is editing. Edits track the service by id, since
/// its row may move while the form is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormTarget {
    #[default]
    Closed,
    Creating,
    Editing(ServiceId),
}

/// A full-list save produced by one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistRequest {
    generation: u64,
    previous: Vec<Service>,
    services: Vec<Service>,
}

impl PersistRequest {
    /// The list to submit.
    pub fn services(&self) -> &[Service] {
        &self.services
    }
}

/// How a save ended, from the surface's point of view.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    /// The host rejected the save; the local change stays.
    KeptOptimistic(DockyardError),
    /// The host rejected the save; the local list was restored.
    RolledBack(DockyardError),
    /// The host rejected the save but a newer mutation has been applied
    /// since, so nothing was restored.
    Superseded(DockyardError),
}

impl SaveOutcome {
    pub fn error(&self) -> Option<&DockyardError> {
        match self {
            Self::Saved => None,
            Self::KeptOptimistic(e) | Self::RolledBack(e) | Self::Superseded(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsSession {
    registry: ServiceRegistry,
    drag: DragSession,
    form: FormTarget,
    policy: PersistPolicy,
    generation: u64,
    restart_pending: bool,
}

impl SettingsSession {
    pub fn new(services: Vec<Service>, policy: PersistPolicy) -> Self {
        Self {
            registry: ServiceRegistry::from_services(services),
            policy,
            ..Self::default()
        }
    }

    pub async fn load(host: &dyn HostBridge, policy: PersistPolicy) -> Result<Self> {
        let services = host.list_services().await?;
        debug!(count = services.len(), "settings loaded services");
        Ok(Self::new(services, policy))
    }

    pub fn services(&self) -> &[Service] {
        self.registry.services()
    }

    pub fn policy(&self) -> PersistPolicy {
        self.policy
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn drag_mut(&mut self) -> &mut DragSession {
        &mut self.drag
    }

    /// A save has succeeded; new services only get a content view after a
    /// restart.
    pub fn restart_pending(&self) -> bool {
        self.restart_pending
    }

    // -- Form -----------------------------------------------------------------

    pub fn form(&self) -> &FormTarget {
        &self.form
    }

    /// Open an empty form for a new service.
    pub fn open_create(&mut self) -> ServiceDraft {
        self.form = FormTarget::Creating;
        ServiceDraft::default()
    }

    /// Open the form pre-filled with the entry at `index`.
    pub fn open_edit(&mut self, index: usize) -> Result<ServiceDraft> {
        let service = self.registry.get(index)?;
        let draft = ServiceDraft::from_service(service);
        self.form = FormTarget::Editing(service.id.clone());
        Ok(draft)
    }

    pub fn close_form(&mut self) {
        self.form = FormTarget::Closed;
    }

    /// Submit the form. The form stays open on error so field messages can
    /// be shown next to their inputs. An edited service that has been
    /// removed meanwhile is `UnknownService`.
    pub fn submit(&mut self, draft: &ServiceDraft) -> Result<PersistRequest> {
        let request = match &self.form {
            FormTarget::Closed => return Err(DockyardError::Host("no form is open".into())),
            FormTarget::Creating => self.create(draft)?,
            FormTarget::Editing(id) => {
                let index = self
                    .registry
                    .position(id)
                    .ok_or_else(|| DockyardError::UnknownService(id.to_string()))?;
                self.update(index, draft)?
            }
        };
        self.form = FormTarget::Closed;
        Ok(request)
    }

    // -- Mutations ------------------------------------------------------------

    pub fn create(&mut self, draft: &ServiceDraft) -> Result<PersistRequest> {
        let mutation = self.registry.create(draft)?;
        Ok(self.request(mutation))
    }

    pub fn update(&mut self, index: usize, draft: &ServiceDraft) -> Result<PersistRequest> {
        let mutation = self.registry.update(index, draft)?;
        Ok(self.request(mutation))
    }

    pub fn delete(&mut self, index: usize) -> Result<PersistRequest> {
        let mutation = self.registry.delete(index)?;
        let removed = mutation.previous.get(index).map(|s| &s.id);
        if let FormTarget::Editing(editing) = &self.form
            && removed == Some(editing)
        {
            self.form = FormTarget::Closed;
        }
        Ok(self.request(mutation))
    }

    /// `Ok(None)` when the order did not change; nothing needs saving.
    pub fn reorder(&mut self, request: ReorderRequest) -> Result<Option<PersistRequest>> {
        Ok(self.registry.reorder(request)?.map(|m| self.request(m)))
    }

    /// Finish the current drag gesture.
    pub fn release_drag(&mut self) -> Result<Option<PersistRequest>> {
        match self.drag.release() {
            Some(request) => self.reorder(request),
            None => Ok(None),
        }
    }

    // -- Persistence ----------------------------------------------------------

    /// Send the list to the host. Host errors are reported as
    /// `PersistenceFailure`.
    pub async fn persist(host: &dyn HostBridge, request: &PersistRequest) -> Result<()> {
        host.save_services(request.services.clone())
            .await
            .map_err(DockyardError::into_persistence)
    }

    /// Apply the result of `persist` for `request`.
    pub fn settle(&mut self, request: PersistRequest, result: Result<()>) -> SaveOutcome {
        let error = match result {
            Ok(()) => {
                self.restart_pending = true;
                return SaveOutcome::Saved;
            }
            Err(e) => e,
        };
        warn!(generation = request.generation, "saving services failed: {error}");

        match self.policy {
            PersistPolicy::KeepOptimistic => SaveOutcome::KeptOptimistic(error),
            PersistPolicy::Rollback if request.generation == self.generation => {
                info!(generation = request.generation, "rolling back failed mutation");
                self.registry.replace_all(request.previous);
                self.generation += 1;
                SaveOutcome::RolledBack(error)
            }
            PersistPolicy::Rollback => SaveOutcome::Superseded(error),
        }
    }

    /// `persist` followed by `settle`.
    pub async fn commit(&mut self, host: &dyn HostBridge, request: PersistRequest) -> SaveOutcome {
        let result = Self::persist(host, &request).await;
        self.settle(request, result)
    }

    pub async fn restart(host: &dyn HostBridge) -> Result<()> {
        info!("restart requested from settings");
        host.restart().await
    }

    fn request(&mut self, mutation: Mutation) -> PersistRequest {
        self.generation += 1;
        PersistRequest {
            generation: self.generation,
            previous: mutation.previous,
            services: mutation.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_bridge::MemoryHost;
    use dockyard_core::error::FieldError;
    use dockyard_core::types::ServiceId;
    use dockyard_core::ServiceIcon;
    use dockyard_registry::RowBounds;

    fn service(name: &str) -> Service {
        Service {
            id: ServiceId::from_name(name),
            name: name.to_string(),
            url: format!("https://{}.test", name.to_lowercase()),
            icon: ServiceIcon::default(),
        }
    }

    async fn session(policy: PersistPolicy) -> (MemoryHost, SettingsSession) {
        let host = MemoryHost::new(vec![service("A"), service("B"), service("C")]);
        let session = SettingsSession::load(&host, policy).await.expect("load");
        (host, session)
    }

    fn names(services: &[Service]) -> Vec<&str> {
        services.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn create_persists_full_list() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        settings.open_create();
        let req = settings
            .submit(&ServiceDraft::new("Mail", "https://mail.test"))
            .expect("submit");
        assert_eq!(*settings.form(), FormTarget::Closed);

        let outcome = settings.commit(&host, req).await;
        assert!(matches!(outcome, SaveOutcome::Saved));
        assert!(settings.restart_pending());
        assert_eq!(names(&host.services()), ["A", "B", "C", "Mail"]);
        assert_eq!(host.services()[3].id, ServiceId::new("mail"));
    }

    #[tokio::test]
    async fn invalid_form_stays_open_and_sends_nothing() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        settings.open_create();
        let err = settings
            .submit(&ServiceDraft::new("", "https://x.test"))
            .unwrap_err();
        assert!(matches!(
            err,
            DockyardError::Validation(ref v) if v.name == Some(FieldError::EmptyField)
        ));
        assert_eq!(*settings.form(), FormTarget::Creating);
        assert_eq!(host.save_count(), 0);
    }

    #[tokio::test]
    async fn edit_form_round_trip() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        let mut draft = settings.open_edit(1).expect("open edit");
        assert_eq!(draft.name, "B");
        draft.url = "https://b2.test".into();
        let req = settings.submit(&draft).expect("submit");
        settings.commit(&host, req).await;
        assert_eq!(host.services()[1].url, "https://b2.test");
        assert_eq!(host.services()[1].id, ServiceId::new("b"));
    }

    #[tokio::test]
    async fn drag_gesture_reorders_and_persists() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        let row = RowBounds::new(80.0, 40.0);
        settings.drag_mut().start(0);
        settings.drag_mut().hover_at(2, 115.0, row);
        let req = settings.release_drag().expect("release").expect("changed");
        settings.commit(&host, req).await;
        assert_eq!(names(&host.services()), ["B", "C", "A"]);
    }

    #[tokio::test]
    async fn self_drop_issues_no_persistence_call() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        settings.drag_mut().start(1);
        settings.drag_mut().hover(1, true);
        assert!(settings.release_drag().expect("release").is_none());
        assert_eq!(host.save_count(), 0);
    }

    #[tokio::test]
    async fn failure_keeps_optimistic_change_by_default() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        host.fail_saves(true);
        let req = settings.delete(0).expect("delete");
        let outcome = settings.commit(&host, req).await;

        assert!(matches!(
            outcome,
            SaveOutcome::KeptOptimistic(DockyardError::PersistenceFailure(_))
        ));
        assert_eq!(names(settings.services()), ["B", "C"]);
        assert_eq!(names(&host.services()), ["A", "B", "C"]);
        assert!(!settings.restart_pending());
    }

    #[tokio::test]
    async fn rollback_policy_restores_previous_list() {
        let (host, mut settings) = session(PersistPolicy::Rollback).await;
        host.fail_saves(true);
        let req = settings.delete(0).expect("delete");
        let outcome = settings.commit(&host, req).await;
        assert!(matches!(outcome, SaveOutcome::RolledBack(_)));
        assert_eq!(names(settings.services()), ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn rollback_skipped_when_newer_mutation_exists() {
        let (host, mut settings) = session(PersistPolicy::Rollback).await;
        host.fail_saves(true);

        // Two saves in flight; the older one fails after the newer mutation.
        let first = settings.delete(0).expect("delete");
        let second = settings
            .reorder(ReorderRequest::new(1, 0, false))
            .expect("reorder")
            .expect("changed");
        let first_result = SettingsSession::persist(&host, &first).await;
        let outcome = settings.settle(first, first_result);

        assert!(matches!(outcome, SaveOutcome::Superseded(_)));
        assert_eq!(names(settings.services()), ["C", "B"]);
        assert_eq!(second.services().len(), 2);
    }

    #[tokio::test]
    async fn out_of_order_completion_is_last_write_wins() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        let older = settings.delete(2).expect("delete");
        let newer = settings.delete(1).expect("delete");

        // The newer save lands first; the host keeps whatever arrives last.
        let r = SettingsSession::persist(&host, &newer).await;
        settings.settle(newer, r);
        let r = SettingsSession::persist(&host, &older).await;
        settings.settle(older, r);

        assert_eq!(names(&host.services()), ["A", "B"]);
        assert_eq!(names(settings.services()), ["A"]);
    }

    #[tokio::test]
    async fn deleting_the_edited_row_closes_the_form() {
        let (_host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        settings.open_edit(2).expect("open");
        settings.delete(2).expect("delete");
        assert_eq!(*settings.form(), FormTarget::Closed);
    }

    #[tokio::test]
    async fn deleting_another_row_keeps_the_edit_on_its_service() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        let mut draft = settings.open_edit(2).expect("open");
        settings.delete(0).expect("delete");
        assert_eq!(*settings.form(), FormTarget::Editing(ServiceId::new("c")));

        draft.name = "Gamma".into();
        let req = settings.submit(&draft).expect("submit");
        settings.commit(&host, req).await;
        assert_eq!(names(&host.services()), ["B", "Gamma"]);
    }

    #[tokio::test]
    async fn edit_follows_its_service_through_a_reorder() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        let mut draft = settings.open_edit(0).expect("open");
        settings
            .reorder(ReorderRequest::new(0, 2, true))
            .expect("reorder")
            .expect("changed");
        assert_eq!(names(settings.services()), ["B", "C", "A"]);

        draft.name = "Alpha".into();
        let req = settings.submit(&draft).expect("submit");
        settings.commit(&host, req).await;

        let saved = host.services();
        assert_eq!(names(&saved), ["B", "C", "Alpha"]);
        assert_eq!(saved[2].id, ServiceId::new("a"));
        assert_eq!(saved[0].id, ServiceId::new("b"));
    }

    #[tokio::test]
    async fn edit_of_a_removed_service_is_rejected() {
        let (host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        let draft = settings.open_edit(1).expect("open");
        // Swap the list underneath the open form, as a rollback would.
        settings.registry.replace_all(vec![service("A"), service("C")]);

        let err = settings.submit(&draft).unwrap_err();
        assert!(matches!(err, DockyardError::UnknownService(ref id) if id == "b"));
        assert_eq!(*settings.form(), FormTarget::Editing(ServiceId::new("b")));
        assert_eq!(host.save_count(), 0);
    }

    #[tokio::test]
    async fn bad_index_is_not_found() {
        let (_host, mut settings) = session(PersistPolicy::KeepOptimistic).await;
        assert!(matches!(
            settings.open_edit(3),
            Err(DockyardError::NotFound { index: 3, len: 3 })
        ));
        assert!(settings.delete(7).is_err());
    }

    #[tokio::test]
    async fn restart_goes_through_host() {
        let (host, _settings) = session(PersistPolicy::KeepOptimistic).await;
        // The memory host cannot restart, which must be reported.
        assert!(SettingsSession::restart(&host).await.is_err());
    }
}
