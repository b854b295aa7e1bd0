// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sidebar — one icon per service, badges, and the settings button.

use dioxus::prelude::*;

use dockyard_bridge::SurfaceKind;
use dockyard_core::icon::ServiceIcon;
use dockyard_core::types::ServiceId;
use dockyard_surface::{SidebarItem, SidebarSession};

use crate::services::app_services::AppServices;
use crate::state::AppState;

/// Ask the host to show `id`, then mark it active in the sidebar.
pub fn select_service(svc: AppServices, mut state: Signal<AppState>, id: ServiceId) {
    spawn(async move {
        match svc.bridge().switch_service(id.clone()).await {
            Ok(()) => state.write().sidebar.set_active(id),
            Err(e) => state.write().report(&e),
        }
    });
}

pub fn open_settings(svc: AppServices, mut state: Signal<AppState>) {
    spawn(async move {
        match svc.bridge().open_settings().await {
            Ok(()) => state.write().sidebar.set_settings_open(),
            Err(e) => state.write().report(&e),
        }
    });
}

#[component]
pub fn Sidebar() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    // Attach first so nothing pushed while loading is lost, then load,
    // restore the last selection, and apply pushes for as long as we live.
    use_hook({
        let svc = svc.clone();
        move || {
            let mut pushes = svc.attach(SurfaceKind::Sidebar);
            spawn(async move {
                match SidebarSession::load(svc.bridge()).await {
                    Ok(mut session) => {
                        if let Err(e) = session.restore(svc.bridge()).await {
                            state.write().report(&e);
                        }
                        state.write().sidebar = session;
                    }
                    Err(e) => state.write().report(&e),
                }
                while let Some(message) = pushes.recv().await {
                    state.write().sidebar.apply_push(message);
                }
                tracing::debug!("sidebar push channel closed");
            });
        }
    });

    let prefs = state.read().sidebar.preferences().clone();
    let items = state.read().sidebar.items();
    let settings_open = state.read().sidebar.view_state().settings_open;

    rsx! {
        nav { class: "sidebar",
            style: "display: flex; flex-direction: column; align-items: center; gap: 8px; width: {prefs.icon_size + 24}px; padding: 12px 0; background: {prefs.sidebar_color};",

            for item in items {
                SidebarIcon {
                    key: "{item.id}",
                    item: item.clone(),
                    size: prefs.icon_size,
                    accent: prefs.accent_color.clone(),
                }
            }

            div { style: "flex: 1;" }

            button {
                title: "Settings",
                style: "width: {prefs.icon_size}px; height: {prefs.icon_size}px; border-radius: 8px; border: none; font-size: 20px; cursor: pointer; background: {settings_bg(settings_open, &prefs.accent_color)};",
                onclick: {
                    let svc = svc.clone();
                    move |_| open_settings(svc.clone(), state)
                },
                "\u{2699}"
            }
        }
    }
}

fn settings_bg(open: bool, accent: &str) -> String {
    if open { accent.to_string() } else { "transparent".to_string() }
}

#[component]
fn SidebarIcon(item: SidebarItem, size: u32, accent: String) -> Element {
    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let border = if item.active { accent.clone() } else { "transparent".to_string() };
    let tooltip = match item.shortcut {
        Some(n) => format!("{} (Ctrl+{n})", item.name),
        None => item.name.clone(),
    };
    let glyph_size = size * 3 / 5;

    rsx! {
        div {
            title: "{tooltip}",
            style: "position: relative; width: {size}px; height: {size}px; display: flex; align-items: center; justify-content: center; border-radius: 10px; border: 2px solid {border}; cursor: pointer;",
            onclick: {
                let svc = svc.clone();
                let id = item.id.clone();
                move |_| select_service(svc.clone(), state, id.clone())
            },
            oncontextmenu: {
                let svc = svc.clone();
                let id = item.id.clone();
                move |evt: MouseEvent| {
                    evt.prevent_default();
                    svc.bridge().show_context_menu(id.clone());
                }
            },
            {match &item.icon {
                ServiceIcon::Image(data_url) => rsx! {
                    img { src: "{data_url}", width: "{glyph_size}", height: "{glyph_size}", alt: "{item.name}" }
                },
                ServiceIcon::Emoji(glyph) => rsx! {
                    span { style: "font-size: {glyph_size}px;", "{glyph}" }
                },
            }}
            if let Some(count) = item.badge {
                span {
                    style: "position: absolute; top: -4px; right: -4px; min-width: 18px; padding: 0 4px; border-radius: 9px; background: {accent}; color: white; font-size: 11px; text-align: center;",
                    "{badge_label(count)}"
                }
            }
        }
    }
}

fn badge_label(count: u32) -> String {
    if count > 99 { "99+".to_string() } else { count.to_string() }
}
