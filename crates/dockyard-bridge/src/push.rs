// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Push channel — host-to-surface messages.
//
// Each live surface attaches once and receives over an unbounded tokio
// channel. Delivery is at-most-once: there is no acknowledgement, no retry
// and no sequence number, and a push to a surface that is not attached (or
// whose receiver has been dropped) is discarded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dockyard_core::types::{BadgeCounts, Preferences, Service};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// An independently running UI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Sidebar,
    Settings,
}

/// Payload schema of the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PushMessage {
    /// The complete badge set. Replaces every badge the surface shows;
    /// services absent from the map have no badge.
    Badges(BadgeCounts),
    /// Preferences to apply to live styling.
    Preferences(Preferences),
    /// The canonical list after a save, in order.
    Services(Vec<Service>),
}

/// Outcome of a push, for logging and tests. Callers never retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Dropped,
}

/// Receiving end held by a mounted surface. Dropping it detaches the
/// surface.
#[derive(Debug)]
pub struct PushReceiver {
    rx: UnboundedReceiver<PushMessage>,
}

impl PushReceiver {
    /// Wait for the next message. `None` once the hub has replaced this
    /// receiver or been dropped.
    pub async fn recv(&mut self) -> Option<PushMessage> {
        self.rx.recv().await
    }

    /// Take a message that has already arrived, without waiting.
    pub fn try_recv(&mut self) -> Option<PushMessage> {
        self.rx.try_recv().ok()
    }
}

/// Host-side registry of attached surfaces.
#[derive(Debug, Clone, Default)]
pub struct PushHub {
    senders: Arc<Mutex<HashMap<SurfaceKind, UnboundedSender<PushMessage>>>>,
}

impl PushHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface. A second attach for the same kind replaces the
    /// first (a remounted surface).
    pub fn attach(&self, surface: SurfaceKind) -> PushReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut senders) = self.senders.lock() {
            senders.insert(surface, tx);
        }
        debug!(?surface, "surface attached to push channel");
        PushReceiver { rx }
    }

    /// Whether `surface` currently has a live receiver.
    pub fn is_attached(&self, surface: SurfaceKind) -> bool {
        self.senders
            .lock()
            .map(|s| s.get(&surface).is_some_and(|tx| !tx.is_closed()))
            .unwrap_or(false)
    }

    /// Fire-and-forget delivery to one surface.
    pub fn push(&self, surface: SurfaceKind, message: PushMessage) -> Delivery {
        let Ok(mut senders) = self.senders.lock() else {
            return Delivery::Dropped;
        };

        let Some(tx) = senders.get(&surface) else {
            debug!(?surface, "surface not mounted, push dropped");
            return Delivery::Dropped;
        };

        if tx.send(message).is_err() {
            debug!(?surface, "surface receiver gone, push dropped");
            senders.remove(&surface);
            return Delivery::Dropped;
        }

        Delivery::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_core::types::ServiceId;

    fn badges(pairs: &[(&str, u32)]) -> BadgeCounts {
        pairs.iter().map(|(id, n)| (ServiceId::new(*id), *n)).collect()
    }

    #[test]
    fn push_to_unmounted_surface_is_dropped() {
        let hub = PushHub::new();
        let outcome = hub.push(SurfaceKind::Sidebar, PushMessage::Badges(badges(&[("a", 1)])));
        assert_eq!(outcome, Delivery::Dropped);
    }

    #[test]
    fn attached_surface_receives_in_order() {
        let hub = PushHub::new();
        let mut rx = hub.attach(SurfaceKind::Sidebar);

        hub.push(SurfaceKind::Sidebar, PushMessage::Badges(badges(&[("a", 1)])));
        hub.push(SurfaceKind::Sidebar, PushMessage::Preferences(Preferences::default()));

        assert_eq!(rx.try_recv(), Some(PushMessage::Badges(badges(&[("a", 1)]))));
        assert_eq!(rx.try_recv(), Some(PushMessage::Preferences(Preferences::default())));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn pushes_are_not_broadcast_to_other_surfaces() {
        let hub = PushHub::new();
        let mut settings = hub.attach(SurfaceKind::Settings);
        hub.push(SurfaceKind::Sidebar, PushMessage::Badges(BadgeCounts::new()));
        assert_eq!(settings.try_recv(), None);
    }

    #[test]
    fn dropped_receiver_detaches() {
        let hub = PushHub::new();
        let rx = hub.attach(SurfaceKind::Sidebar);
        assert!(hub.is_attached(SurfaceKind::Sidebar));
        drop(rx);
        assert!(!hub.is_attached(SurfaceKind::Sidebar));
        assert_eq!(
            hub.push(SurfaceKind::Sidebar, PushMessage::Badges(BadgeCounts::new())),
            Delivery::Dropped
        );
    }

    #[test]
    fn messages_sent_before_remount_are_lost() {
        let hub = PushHub::new();
        let old = hub.attach(SurfaceKind::Sidebar);
        drop(old);
        hub.push(SurfaceKind::Sidebar, PushMessage::Badges(badges(&[("a", 2)])));

        let mut fresh = hub.attach(SurfaceKind::Sidebar);
        assert_eq!(fresh.try_recv(), None);
    }

    #[test]
    fn payload_schema_is_tagged() {
        let json = serde_json::to_value(PushMessage::Badges(badges(&[("mail", 3)]))).unwrap();
        assert_eq!(json["type"], "badges");
        assert_eq!(json["payload"]["mail"], 3);
    }

    #[test]
    fn service_list_payload_is_an_array() {
        let json = serde_json::to_value(PushMessage::Services(Vec::new())).unwrap();
        assert_eq!(json["type"], "services");
        assert!(json["payload"].as_array().is_some_and(|a| a.is_empty()));
    }

    #[tokio::test]
    async fn recv_waits_for_push() {
        let hub = PushHub::new();
        let mut rx = hub.attach(SurfaceKind::Sidebar);
        let sender = hub.clone();
        tokio::spawn(async move {
            sender.push(SurfaceKind::Sidebar, PushMessage::Preferences(Preferences::default()));
        });
        assert_eq!(rx.recv().await, Some(PushMessage::Preferences(Preferences::default())));
    }
}
