// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use std::collections::HashMap;

use dockyard_core::error::DockyardError;
use dockyard_core::human_errors::{humanize_error, HumanError};
use dockyard_core::types::ServiceId;
use dockyard_host::ViewCommand;
use dockyard_surface::SidebarSession;

/// What the content area displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Visible {
    #[default]
    Nothing,
    Service(ServiceId),
    Settings,
}

/// Shell-side mirror of the content views, driven by host view commands.
///
/// A view with no URL is blank: never loaded, hibernated, or removed.
#[derive(Debug, Clone, Default)]
pub struct ContentViews {
    loaded: HashMap<ServiceId, String>,
    visible: Visible,
    context_menu: Option<ServiceId>,
    restart_requested: bool,
}

impl ContentViews {
    pub fn apply(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Show { id } => {
                self.visible = Visible::Service(id);
            }
            ViewCommand::Navigate { id, url } => {
                self.loaded.insert(id, url);
            }
            ViewCommand::Blank { id } => {
                self.loaded.remove(&id);
                if self.visible == Visible::Service(id.clone()) {
                    self.visible = Visible::Nothing;
                }
                if self.context_menu.as_ref() == Some(&id) {
                    self.context_menu = None;
                }
            }
            ViewCommand::ShowSettings => {
                self.visible = Visible::Settings;
            }
            ViewCommand::ContextMenu { id } => {
                self.context_menu = Some(id);
            }
            ViewCommand::Restart => {
                self.restart_requested = true;
            }
        }
    }

    pub fn visible(&self) -> &Visible {
        &self.visible
    }

    /// Loaded views, sorted for stable rendering.
    pub fn loaded(&self) -> Vec<(ServiceId, String)> {
        let mut views: Vec<_> = self
            .loaded
            .iter()
            .map(|(id, url)| (id.clone(), url.clone()))
            .collect();
        views.sort();
        views
    }

    pub fn context_menu(&self) -> Option<&ServiceId> {
        self.context_menu.as_ref()
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub sidebar: SidebarSession,
    pub content: ContentViews,
    /// Blocking notice shown over the content area.
    pub notice: Option<HumanError>,
}

impl AppState {
    pub fn report(&mut self, err: &DockyardError) {
        tracing::error!(error = %err, "action failed");
        self.notice = Some(humanize_error(err));
    }
}
