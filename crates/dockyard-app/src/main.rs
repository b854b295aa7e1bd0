// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dockyard — a sidebar of web services in one desktop window.
//
// Entry point. Initialises logging, opens the host, and launches the Dioxus
// shell.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use dockyard_core::error::DockyardError;
use dockyard_host::store::load_config;
use dockyard_host::{data_dir, ViewCommand};

use pages::content::ContentPane;
use pages::sidebar::{select_service, Sidebar};
use services::app_services::AppServices;
use state::AppState;

fn main() {
    let config = load_config(&data_dir::base_dir());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("Dockyard starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| {
        AppServices::init()
            .or_else(|e| {
                tracing::error!(error = %e, "data directory unusable, falling back to scratch storage");
                AppServices::fallback()
            })
            .map_err(|e| e.to_string())
    });

    match svc {
        Ok(svc) => rsx! { Root { svc } },
        Err(message) => rsx! {
            div { style: "padding: 32px; font-family: system-ui, -apple-system, sans-serif;",
                h2 { "Dockyard could not start" }
                p { "{message}" }
            }
        },
    }
}

#[component]
fn Root(svc: AppServices) -> Element {
    use_context_provider(|| svc.clone());
    let mut state = use_context_provider(|| Signal::new(AppState::default()));

    // The host drives the content views through this stream.
    use_hook({
        let svc = svc.clone();
        move || {
            let Some(mut commands) = svc.take_view_commands() else {
                tracing::warn!("view commands already taken");
                return;
            };
            spawn(async move {
                while let Some(command) = commands.recv().await {
                    let restart = matches!(command, ViewCommand::Restart);
                    state.write().content.apply(command);
                    if restart && let Err(e) = relaunch() {
                        state.write().report(&DockyardError::from(e));
                    }
                }
            });
        }
    });

    use_hook({
        let svc = svc.clone();
        move || {
            spawn(svc.host().run_hibernation());
        }
    });

    rsx! {
        div {
            style: "display: flex; flex-direction: row; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",
            tabindex: "0",
            onkeydown: {
                let svc = svc.clone();
                move |evt: KeyboardEvent| {
                    let modifiers = evt.modifiers();
                    if !(modifiers.ctrl() || modifiers.meta()) {
                        return;
                    }
                    let Some(n) = shortcut_digit(&evt.key()) else { return };
                    let target = state.read().sidebar.shortcut_target(n).cloned();
                    if let Some(id) = target {
                        evt.prevent_default();
                        select_service(svc.clone(), state, id);
                    }
                }
            },
            Sidebar {}
            ContentPane {}
        }
    }
}

fn shortcut_digit(key: &Key) -> Option<usize> {
    match key {
        Key::Character(c) => c.parse::<usize>().ok(),
        _ => None,
    }
}

/// Start a fresh copy of this binary and exit.
fn relaunch() -> std::io::Result<()> {
    let exe = std::env::current_exe()?;
    tracing::info!(exe = %exe.display(), "restarting");
    std::process::Command::new(exe)
        .args(std::env::args_os().skip(1))
        .spawn()?;
    std::process::exit(0);
}
