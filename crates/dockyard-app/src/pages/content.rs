// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content pane — hosts the service views, the settings page, the context
// menu and blocking notices.

use dioxus::prelude::*;

use dockyard_core::human_errors::Presentation;
use dockyard_core::types::ServiceId;

use crate::pages::settings::Settings;
use crate::services::app_services::AppServices;
use crate::state::{AppState, Visible};

/// How often loaded views are asked for their title.
const TITLE_POLL_SECS: u64 = 5;

fn frame_id(id: &ServiceId) -> String {
    let safe: String = id
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!("view-{safe}")
}

#[component]
pub fn ContentPane() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    // Document titles carry unread counts. Cross-origin frames hide theirs,
    // in which case the title read returns an empty title and is ignored.
    let svc_poll = svc.clone();
    let _title_poller = use_resource(move || {
        let host = svc_poll.host();
        async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(TITLE_POLL_SECS)).await;
                let views = state.read().content.loaded();
                for (id, _) in views {
                    let js = format!(
                        "try {{ return document.getElementById('{}').contentDocument.title || ''; }} catch (e) {{ return ''; }}",
                        frame_id(&id)
                    );
                    if let Ok(title) = document::eval(&js).join::<String>().await {
                        host.handle_title_change(&id, &title);
                    }
                }
            }
        }
    });

    let content = state.read().content.clone();
    let visible = content.visible().clone();
    let notice = state.read().notice.clone();

    rsx! {
        div { style: "position: relative; flex: 1; height: 100vh; background: #fff;",
            for (id, url) in content.loaded() {
                iframe {
                    key: "{id}",
                    id: "{frame_id(&id)}",
                    src: "{url}",
                    style: frame_style(&visible, &id),
                }
            }

            {match visible {
                Visible::Settings => rsx! {
                    div { style: "position: absolute; inset: 0; overflow-y: auto; padding: 16px;",
                        Settings {}
                    }
                },
                Visible::Nothing => rsx! {
                    div { style: "display: flex; height: 100%; align-items: center; justify-content: center; color: #888;",
                        "Pick a service from the sidebar."
                    }
                },
                Visible::Service(_) => rsx! {},
            }}

            if let Some(id) = content.context_menu().cloned() {
                ContextMenu { id }
            }

            if let Some(notice) = notice {
                div {
                    style: "position: absolute; left: 16px; right: 16px; bottom: 16px; padding: 12px 16px; border-radius: 8px; background: {notice_bg(notice.presentation)}; color: #222; box-shadow: 0 2px 8px rgba(0,0,0,0.2);",
                    strong { "{notice.message}" }
                    p { style: "margin: 4px 0 8px 0; font-size: 14px;", "{notice.suggestion}" }
                    button {
                        onclick: move |_| state.write().notice = None,
                        "Dismiss"
                    }
                }
            }
        }
    }
}

fn frame_style(visible: &Visible, id: &ServiceId) -> &'static str {
    match visible {
        Visible::Service(shown) if shown == id => {
            "position: absolute; inset: 0; width: 100%; height: 100%; border: none;"
        }
        _ => "display: none;",
    }
}

fn notice_bg(presentation: Presentation) -> &'static str {
    match presentation {
        Presentation::Inline => "#fff3cd",
        Presentation::Blocking => "#f8d7da",
        Presentation::Bug => "#e2e3e5",
    }
}

/// Per-service actions, opened by right-clicking a sidebar icon.
#[component]
fn ContextMenu(id: ServiceId) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let url = use_resource({
        let svc = svc.clone();
        let id = id.clone();
        move || {
            let svc = svc.clone();
            let id = id.clone();
            async move { svc.bridge().service_url(id).await.ok().flatten() }
        }
    });

    rsx! {
        div {
            style: "position: absolute; top: 16px; left: 16px; min-width: 220px; padding: 8px; border-radius: 8px; background: white; box-shadow: 0 2px 12px rgba(0,0,0,0.25);",
            strong { "{id}" }
            if let Some(Some(url)) = url.read().as_ref() {
                p { style: "margin: 4px 0; font-size: 12px; color: #666; word-break: break-all;", "{url}" }
            }
            button {
                style: "display: block; width: 100%; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    let id = id.clone();
                    move |_| {
                        let svc = svc.clone();
                        let id = id.clone();
                        state.write().content.close_context_menu();
                        spawn(async move {
                            if let Err(e) = svc.bridge().reload_service(id).await {
                                state.write().report(&e);
                            }
                        });
                    }
                },
                "Reload"
            }
            button {
                style: "display: block; width: 100%; margin-top: 4px;",
                onclick: move |_| state.write().content.close_context_menu(),
                "Close"
            }
        }
    }
}
