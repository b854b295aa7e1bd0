// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pull channel — the calls a surface makes into the host.
//
// Every call is asynchronous and may suspend the caller; none can be
// cancelled once issued. No ordering is imposed between concurrent calls:
// the host applies full-list saves last-write-wins.

use std::future::Future;
use std::pin::Pin;

use dockyard_core::error::Result;
use dockyard_core::types::{BadgeCounts, Preferences, Service, ServiceId};

/// Boxed future returned by [`HostBridge`] methods, so the trait stays
/// object-safe.
pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Host operations available to a surface.
pub trait HostBridge: Send + Sync {
    /// The canonical ordered service list.
    fn list_services(&self) -> BridgeFuture<'_, Vec<Service>>;

    /// Replace the canonical list with `services`.
    fn save_services(&self, services: Vec<Service>) -> BridgeFuture<'_, ()>;

    fn get_preferences(&self) -> BridgeFuture<'_, Preferences>;

    /// Replace the stored preferences.
    fn save_preferences(&self, preferences: Preferences) -> BridgeFuture<'_, ()>;

    /// Show the content view of `id` and remember it as last active.
    fn switch_service(&self, id: ServiceId) -> BridgeFuture<'_, ()>;

    /// Show the settings surface in the content area.
    fn open_settings(&self) -> BridgeFuture<'_, ()>;

    fn last_active_service(&self) -> BridgeFuture<'_, Option<ServiceId>>;

    /// Reload the content view of `id` from its URL.
    fn reload_service(&self, id: ServiceId) -> BridgeFuture<'_, ()>;

    fn service_url(&self, id: ServiceId) -> BridgeFuture<'_, Option<String>>;

    /// Current badge counts, for a surface that may have missed pushes
    /// while starting up.
    fn badge_counts(&self) -> BridgeFuture<'_, BadgeCounts>;

    /// Ask the host to show its native context menu for `id`.
    /// Fire-and-forget: there is no result.
    fn show_context_menu(&self, id: ServiceId);

    /// Restart the whole process. Only returns if the restart could not be
    /// requested.
    fn restart(&self) -> BridgeFuture<'_, ()>;
}
