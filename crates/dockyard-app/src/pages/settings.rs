// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — manage the service list, preferences and save behaviour.

use std::collections::HashMap;
use std::rc::Rc;

use dioxus::prelude::*;

use dockyard_core::config::PersistPolicy;
use dockyard_core::error::{DockyardError, Result};
use dockyard_core::human_errors::{field_message, humanize_error};
use dockyard_core::types::{ICON_SIZE_MAX, ICON_SIZE_MIN, ServiceDraft};
use dockyard_registry::RowBounds;
use dockyard_surface::{
    FormTarget, PersistRequest, PreferenceStore, PreferencesPatch, SettingsSession,
};

use crate::services::app_services::AppServices;
use crate::services::icon_file;
use crate::state::AppState;

const ROW_STYLE: &str = "display: flex; align-items: center; gap: 12px; padding: 10px 8px; border-bottom: 1px solid #f0f0f0; cursor: grab;";

/// Send `request` to the host, then let the session apply the save policy.
fn commit(
    svc: AppServices,
    mut session: Signal<Option<SettingsSession>>,
    mut state: Signal<AppState>,
    request: PersistRequest,
) {
    spawn(async move {
        let result = SettingsSession::persist(svc.bridge(), &request).await;
        let outcome = {
            let mut guard = session.write();
            match &mut *guard {
                Some(settings) => settings.settle(request, result),
                None => return,
            }
        };
        if let Some(e) = outcome.error() {
            state.write().report(e);
        }
    });
}

/// Run a list mutation and persist whatever it produced.
fn mutate(
    svc: AppServices,
    mut session: Signal<Option<SettingsSession>>,
    mut state: Signal<AppState>,
    change: impl FnOnce(&mut SettingsSession) -> Result<Option<PersistRequest>>,
) {
    let result = {
        let mut guard = session.write();
        match &mut *guard {
            Some(settings) => change(settings),
            None => return,
        }
    };
    match result {
        Ok(Some(request)) => commit(svc, session, state, request),
        Ok(None) => {}
        Err(e) => state.write().report(&e),
    }
}

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut session = use_signal(|| Option::<SettingsSession>::None);
    let mut prefs = use_signal(|| Option::<PreferenceStore>::None);

    use_hook({
        let svc = svc.clone();
        move || {
            let policy = svc.config().persist_policy;
            spawn(async move {
                match SettingsSession::load(svc.bridge(), policy).await {
                    Ok(loaded) => session.set(Some(loaded)),
                    Err(e) => state.write().report(&e),
                }
                match PreferenceStore::load(svc.bridge()).await {
                    Ok(loaded) => prefs.set(Some(loaded)),
                    Err(e) => state.write().report(&e),
                }
            });
        }
    });

    let Some(settings) = session.read().clone() else {
        return rsx! {
            p { style: "color: #888;", "Loading settings\u{2026}" }
        };
    };

    rsx! {
        div { style: "max-width: 640px; margin: 0 auto; font-family: system-ui, -apple-system, sans-serif;",
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Services" }
                ServiceList { session }
                if *settings.form() == FormTarget::Closed {
                    button {
                        style: "margin-top: 12px; padding: 8px 16px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| {
                            if let Some(s) = &mut *session.write() {
                                s.open_create();
                            }
                        },
                        "Add service"
                    }
                } else {
                    ServiceForm { key: "{settings.form():?}", session }
                }
                if settings.restart_pending() {
                    div { style: "margin-top: 12px; padding: 10px; border-radius: 6px; background: #eef6ff; display: flex; justify-content: space-between; align-items: center;",
                        span { "New services appear after a restart." }
                        button {
                            onclick: {
                                let svc = svc.clone();
                                move |_| {
                                    let svc = svc.clone();
                                    spawn(async move {
                                        if let Err(e) = SettingsSession::restart(svc.bridge()).await {
                                            state.write().report(&e);
                                        }
                                    });
                                }
                            },
                            "Restart now"
                        }
                    }
                }
            }

            if prefs.read().is_some() {
                PreferencesSection { prefs }
            }

            SaveBehaviour {}
        }
    }
}

#[component]
fn ServiceList(session: Signal<Option<SettingsSession>>) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut mounted = use_signal(HashMap::<usize, Rc<MountedData>>::new);
    let mut bounds = use_signal(HashMap::<usize, RowBounds>::new);

    let Some(settings) = session.read().clone() else {
        return rsx! {};
    };
    let indicator = settings.drag().drop_indicator();
    let dragging = settings.drag().source();

    rsx! {
        div {
            for (i, service) in settings.services().iter().cloned().enumerate() {
                div {
                    key: "{service.id}",
                    draggable: "true",
                    style: "{ROW_STYLE} {row_marker(indicator, i)} {row_opacity(dragging, i)}",
                    onmounted: move |evt: MountedEvent| {
                        mounted.write().insert(i, evt.data());
                    },
                    ondragstart: move |_| {
                        if let Some(s) = &mut *session.write() {
                            s.drag_mut().start(i);
                        }
                        // Row positions shift with scrolling, so measure at the
                        // start of every gesture.
                        let rows: Vec<_> = mounted.read().iter().map(|(k, m)| (*k, Rc::clone(m))).collect();
                        spawn(async move {
                            for (row, data) in rows {
                                if let Ok(rect) = data.get_client_rect().await {
                                    bounds.write().insert(row, RowBounds::new(rect.origin.y, rect.size.height));
                                }
                            }
                        });
                    },
                    ondragover: move |evt: DragEvent| {
                        evt.prevent_default();
                        let y = evt.client_coordinates().y;
                        let row = bounds.read().get(&i).copied();
                        if let Some(s) = &mut *session.write() {
                            match row {
                                Some(row) => s.drag_mut().hover_at(i, y, row),
                                None => s.drag_mut().hover(i, false),
                            }
                        }
                    },
                    ondragleave: move |_| {
                        if let Some(s) = &mut *session.write() {
                            s.drag_mut().leave_row(i);
                        }
                    },
                    ondrop: {
                        let svc = svc.clone();
                        move |evt: DragEvent| {
                            evt.prevent_default();
                            mutate(svc.clone(), session, state, |s| s.release_drag());
                        }
                    },
                    ondragend: move |_| {
                        if let Some(s) = &mut *session.write() {
                            s.drag_mut().cancel();
                        }
                    },

                    span { style: "color: #bbb;", "\u{2630}" }
                    IconPreview { icon: service.icon.as_str().to_string(), image: service.icon.is_image() }
                    div { style: "flex: 1; min-width: 0;",
                        div { "{service.name}" }
                        div { style: "font-size: 12px; color: #888; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", "{service.url}" }
                    }
                    button {
                        onclick: move |_| {
                            let opened = match &mut *session.write() {
                                Some(s) => s.open_edit(i).map(|_| ()),
                                None => Ok(()),
                            };
                            if let Err(e) = opened {
                                state.write().report(&e);
                            }
                        },
                        "Edit"
                    }
                    button {
                        style: "color: #c00;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| mutate(svc.clone(), session, state, |s| s.delete(i).map(Some))
                        },
                        "Delete"
                    }
                }
            }
        }
    }
}

fn row_marker(indicator: Option<(usize, bool)>, row: usize) -> &'static str {
    match indicator {
        Some((target, false)) if target == row => "border-top: 2px solid #007aff;",
        Some((target, true)) if target == row => "border-bottom: 2px solid #007aff;",
        _ => "",
    }
}

fn row_opacity(source: Option<usize>, row: usize) -> &'static str {
    if source == Some(row) { "opacity: 0.4;" } else { "" }
}

#[component]
fn IconPreview(icon: String, image: bool) -> Element {
    rsx! {
        if image {
            img { src: "{icon}", width: "28", height: "28" }
        } else {
            span { style: "font-size: 22px; width: 28px; text-align: center;", "{icon}" }
        }
    }
}

/// Create / edit form. The draft lives here; the session only knows which
/// service is being edited.
#[component]
fn ServiceForm(session: Signal<Option<SettingsSession>>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut error = use_signal(|| Option::<DockyardError>::None);
    let mut draft = use_signal(move || match session.peek().as_ref() {
        Some(s) => match s.form() {
            FormTarget::Editing(id) => s
                .services()
                .iter()
                .find(|entry| &entry.id == id)
                .map(ServiceDraft::from_service)
                .unwrap_or_default(),
            _ => ServiceDraft::default(),
        },
        None => ServiceDraft::default(),
    });

    let current = draft.read().clone();
    let (name_hint, url_hint, icon_hint) = hints(error.read().as_ref());
    let editing = session
        .read()
        .as_ref()
        .is_some_and(|s| matches!(s.form(), FormTarget::Editing(_)));
    let title = if editing { "Edit service" } else { "New service" };

    rsx! {
        div { style: "margin-top: 12px; padding: 12px; border: 1px solid #ddd; border-radius: 8px;",
            h4 { style: "margin-top: 0;", "{title}" }

            label { "Name" }
            input {
                style: "display: block; width: 100%; padding: 6px; margin-bottom: 4px;",
                value: "{current.name}",
                oninput: move |evt| draft.write().name = evt.value(),
            }
            if let Some(hint) = name_hint {
                p { style: "color: #c00; font-size: 12px; margin: 0 0 8px 0;", "{hint}" }
            }

            label { "URL" }
            input {
                style: "display: block; width: 100%; padding: 6px; margin-bottom: 4px;",
                placeholder: "https://",
                value: "{current.url}",
                oninput: move |evt| draft.write().url = evt.value(),
            }
            if let Some(hint) = url_hint {
                p { style: "color: #c00; font-size: 12px; margin: 0 0 8px 0;", "{hint}" }
            }

            label { "Icon" }
            div { style: "display: flex; align-items: center; gap: 8px; margin-bottom: 4px;",
                if let Some(image) = current.icon_image.clone() {
                    img { src: "{image}", width: "28", height: "28" }
                    button {
                        onclick: move |_| draft.write().icon_image = None,
                        "Remove image"
                    }
                } else {
                    input {
                        style: "width: 60px; padding: 6px; text-align: center;",
                        placeholder: "\u{1F310}",
                        value: "{current.icon_text.clone().unwrap_or_default()}",
                        oninput: move |evt| {
                            let text = evt.value();
                            draft.write().icon_text = (!text.is_empty()).then_some(text);
                        },
                    }
                    button {
                        onclick: move |_| match icon_file::pick_icon() {
                            Some(Ok(icon)) => {
                                draft.write().icon_image = Some(icon.as_str().to_string());
                                error.set(None);
                            }
                            Some(Err(e)) => error.set(Some(e)),
                            None => {}
                        },
                        "Choose image\u{2026}"
                    }
                }
            }
            if let Some(hint) = icon_hint {
                p { style: "color: #c00; font-size: 12px; margin: 0 0 8px 0;", "{hint}" }
            }

            div { style: "display: flex; gap: 8px; margin-top: 12px;",
                button {
                    style: "padding: 8px 16px; border-radius: 6px; border: none; background: #007aff; color: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let submitted = draft.read().clone();
                            let result = {
                                let mut guard = session.write();
                                match &mut *guard {
                                    Some(s) => s.submit(&submitted),
                                    None => return,
                                }
                            };
                            match result {
                                Ok(request) => {
                                    error.set(None);
                                    commit(svc.clone(), session, state, request);
                                }
                                Err(e) => error.set(Some(e)),
                            }
                        }
                    },
                    "Save"
                }
                button {
                    onclick: move |_| {
                        if let Some(s) = &mut *session.write() {
                            s.close_form();
                        }
                    },
                    "Cancel"
                }
            }
        }
    }
}

/// Per-field messages for the form: name, URL, icon.
fn hints(err: Option<&DockyardError>) -> (Option<String>, Option<String>, Option<String>) {
    match err {
        Some(DockyardError::Validation(v)) => (
            v.name.map(|e| field_message("name", e)),
            v.url.map(|e| field_message("URL", e)),
            None,
        ),
        Some(e @ DockyardError::DuplicateIdentity { .. }) => {
            let human = humanize_error(e);
            (Some(format!("{} {}", human.message, human.suggestion)), None, None)
        }
        Some(e @ DockyardError::UnsupportedIcon(_)) => {
            let human = humanize_error(e);
            (None, None, Some(format!("{} {}", human.message, human.suggestion)))
        }
        Some(e) => (Some(humanize_error(e).message), None, None),
        None => (None, None, None),
    }
}

#[component]
fn PreferencesSection(prefs: Signal<Option<PreferenceStore>>) -> Element {
    let svc = use_context::<AppServices>();
    let mut patch = use_signal(PreferencesPatch::default);
    let mut message = use_signal(|| Option::<String>::None);

    let Some(store) = prefs.read().clone() else {
        return rsx! {};
    };
    let shown = patch.read().apply_to(store.current());

    rsx! {
        section { style: "margin: 24px 0;",
            h3 { "Appearance" }
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                span { "Icon size ({shown.icon_size}px)" }
                input {
                    r#type: "range",
                    min: "{ICON_SIZE_MIN}",
                    max: "{ICON_SIZE_MAX}",
                    value: "{shown.icon_size}",
                    oninput: move |evt| {
                        if let Ok(size) = evt.value().parse::<u32>() {
                            patch.write().icon_size = Some(size);
                        }
                    },
                }
            }
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                span { "Sidebar colour" }
                input {
                    r#type: "color",
                    value: "{shown.sidebar_color}",
                    onchange: move |evt| patch.write().sidebar_color = Some(evt.value()),
                }
            }
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                span { "Accent colour" }
                input {
                    r#type: "color",
                    value: "{shown.accent_color}",
                    onchange: move |evt| patch.write().accent_color = Some(evt.value()),
                }
            }
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                span { "Unread notifications" }
                input {
                    r#type: "checkbox",
                    checked: shown.notifications_enabled,
                    onchange: move |evt| patch.write().notifications_enabled = Some(evt.checked()),
                }
            }
            button {
                style: "width: 100%; padding: 10px; border-radius: 8px; border: none; background: #007aff; color: white; margin-top: 8px;",
                disabled: patch.read().is_empty(),
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let Some(mut store) = prefs.read().clone() else { return };
                        let pending = patch.read().clone();
                        let svc = svc.clone();
                        spawn(async move {
                            match store.save(svc.bridge(), &pending).await {
                                Ok(()) => {
                                    prefs.set(Some(store));
                                    patch.set(PreferencesPatch::default());
                                    message.set(Some("Preferences saved.".into()));
                                }
                                Err(e) => {
                                    let human = humanize_error(&e);
                                    message.set(Some(format!("{} {}", human.message, human.suggestion)));
                                }
                            }
                        });
                    }
                },
                "Save preferences"
            }
            if let Some(msg) = message.read().clone() {
                p { style: "font-size: 14px; text-align: center; margin-top: 8px;", "{msg}" }
            }
        }
    }
}

/// What happens to a local change when the host refuses to save it.
#[component]
fn SaveBehaviour() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut policy = use_signal({
        let svc = svc.clone();
        move || svc.config().persist_policy
    });

    rsx! {
        section { style: "margin: 24px 0;",
            h3 { "When a save fails" }
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0;",
                span { "Local changes" }
                select {
                    style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                    value: policy_label(*policy.read()),
                    onchange: {
                        let svc = svc.clone();
                        move |evt: FormEvent| {
                            let Some(chosen) = policy_from_label(&evt.value()) else { return };
                            let mut config = svc.config();
                            config.persist_policy = chosen;
                            match svc.save_config(&config) {
                                Ok(()) => policy.set(chosen),
                                Err(e) => state.write().report(&e),
                            }
                        }
                    },
                    option { value: "keep", "Keep them" }
                    option { value: "rollback", "Undo them" }
                }
            }
            p { style: "color: #888; font-size: 12px;", "Takes effect the next time settings opens." }
        }
    }
}

fn policy_label(policy: PersistPolicy) -> &'static str {
    match policy {
        PersistPolicy::KeepOptimistic => "keep",
        PersistPolicy::Rollback => "rollback",
    }
}

fn policy_from_label(label: &str) -> Option<PersistPolicy> {
    match label {
        "keep" => Some(PersistPolicy::KeepOptimistic),
        "rollback" => Some(PersistPolicy::Rollback),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_core::error::{FieldError, ValidationErrors};

    #[test]
    fn policy_labels_round_trip() {
        for policy in [PersistPolicy::KeepOptimistic, PersistPolicy::Rollback] {
            assert_eq!(policy_from_label(policy_label(policy)), Some(policy));
        }
        assert_eq!(policy_from_label("bogus"), None);
    }

    #[test]
    fn validation_hints_go_to_their_fields() {
        let err = DockyardError::Validation(ValidationErrors {
            name: None,
            url: Some(FieldError::InvalidUrl),
        });
        let (name, url, icon) = hints(Some(&err));
        assert!(name.is_none());
        assert!(url.is_some_and(|m| m.contains("https://")));
        assert!(icon.is_none());
    }

    #[test]
    fn drop_marker_follows_indicator() {
        assert!(row_marker(Some((2, false)), 2).contains("border-top"));
        assert!(row_marker(Some((2, true)), 2).contains("border-bottom"));
        assert_eq!(row_marker(Some((2, true)), 1), "");
        assert_eq!(row_marker(None, 0), "");
    }
}
