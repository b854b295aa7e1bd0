// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native desktop notifications for badge increases.

use dockyard_host::{LogNotifier, Notifier};
use notify_rust::Notification;
use tracing::warn;

const APP_NAME: &str = "Dockyard";

/// Shows notifications through the platform notification service
/// (D-Bus on Linux, Notification Center on macOS, toasts on Windows).
///
/// Delivery runs on its own thread so a slow notification daemon never
/// stalls title handling. When the platform refuses, the notification is
/// logged instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let notification = build(title, body);
        let (title, body) = (title.to_string(), body.to_string());
        std::thread::spawn(move || {
            if let Err(e) = notification.show() {
                warn!("desktop notification failed: {e}");
                LogNotifier.notify(&title, &body);
            }
        });
    }
}

fn build(title: &str, body: &str) -> Notification {
    let mut notification = Notification::new();
    notification.appname(APP_NAME).summary(title).body(body);
    notification
}
