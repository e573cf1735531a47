use dioxus::prelude::*;

use crate::db;
use crate::directory::{ManagerDirectory, ManagerRecord};
use crate::error::{CallSheetError, RequiredField};
use crate::form::{FormState, FORMAT_OPTIONS};
use crate::i18n::{t, t_with};
use crate::print::{generate_print, resolve_logo};
use crate::render::{render_sheet, RenderTarget};
use crate::settings::SheetSettings;
use crate::views::{notify_error, Banner};
#[cfg(target_arch = "wasm32")] use crate::print::browser::BrowserPrintWindow;
#[cfg(not(target_arch = "wasm32"))] use crate::print::file::HtmlFileSurface;

const MAX_SUGGESTIONS: usize = 8;

fn field_label(field: RequiredField) -> String {
    match field {
        RequiredField::Date => t("sheet.date"),
        RequiredField::Guest => t("sheet.guest"),
        RequiredField::PatTime => t("sheet.pat"),
        RequiredField::ManagerName => t("sheet.manager_name"),
        RequiredField::ManagerPhone => t("sheet.manager_phone"),
    }
}

fn error_message(e: &CallSheetError) -> String {
    match e {
        CallSheetError::MissingFields(fields) => {
            let list = fields.iter().map(|f| field_label(*f)).collect::<Vec<_>>().join(", ");
            t_with("sheet.missing_fields", &[("fields", &list)])
        }
        CallSheetError::PopupBlocked => t("sheet.popup_blocked"),
        other => t_with("common.error", &[("error", &other.to_string())]),
    }
}

#[cfg(target_arch = "wasm32")]
fn page_href() -> String {
    web_sys::window().and_then(|w| w.location().href().ok()).unwrap_or_default()
}
#[cfg(not(target_arch = "wasm32"))]
fn page_href() -> String { String::new() }

#[component]
fn SuggestionItem(record: ManagerRecord, on_pick: EventHandler<ManagerRecord>) -> Element {
    let picked = record.clone();
    rsx! {
        // mousedown runs before the input loses focus
        li { onmousedown: move |_| on_pick.call(picked.clone()),
            strong { "{record.name}" }
            span { class: "muted", " {record.phone}" }
        }
    }
}

#[component]
pub fn CallSheet() -> Element {
    let mut form = use_context::<Signal<FormState>>();
    let mut directory = use_context::<Signal<ManagerDirectory>>();
    let settings = use_context::<Signal<SheetSettings>>();
    let banner = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut show_suggestions = use_signal(|| false);

    let preview = use_memo(move || {
        let f = form.read();
        render_sheet(&f, &f.schedule(), &settings.read(), &RenderTarget::Preview)
    });

    let suggestions = use_memo(move || {
        let query = form.read().manager_name.clone();
        directory.read().search(&query).into_iter().take(MAX_SUGGESTIONS).cloned().collect::<Vec<ManagerRecord>>()
    });

    let on_print = move |_| {
        notice.set(None);
        let snapshot = form.read().clone();
        let sheet_settings = settings.read().clone();
        let logo = resolve_logo(&page_href(), &sheet_settings.logo_path);
        #[cfg(target_arch = "wasm32")]
        let mut surface = BrowserPrintWindow;
        #[cfg(not(target_arch = "wasm32"))]
        let mut surface = HtmlFileSurface::in_current_dir();

        let result = generate_print(&snapshot, &sheet_settings, &logo, &mut directory.write(), &mut surface);
        match result {
            Ok(outcome) => {
                let mut lines = Vec::new();
                if outcome.directory_changed {
                    match db::save_managers(&directory.read()) {
                        Ok(()) => lines.push(t_with("sheet.manager_saved", &[("name", snapshot.manager_name.trim())])),
                        Err(e) => {
                            tracing::warn!(error = %e, "directory not persisted after print");
                            notify_error(banner, error_message(&e));
                        }
                    }
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    if let Some(path) = &surface.written {
                        lines.push(t_with("sheet.file_written", &[("path", &path.display().to_string())]));
                    }
                }
                if !lines.is_empty() {
                    notice.set(Some(lines.join(" ")));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "print aborted");
                notify_error(banner, error_message(&e));
            }
        }
    };

    let f = form.read().clone();
    let computed = f.schedule();

    rsx! {
        div { class: "page page-split",
            section { class: "card form-card",
                h1 { class: "card-title", {t("sheet.title")} }
                Banner { message: banner, kind: "error" }
                Banner { message: notice, kind: "info" }

                div { class: "field",
                    label { {t("sheet.format")} }
                    select {
                        value: "{f.format_type}",
                        onchange: move |e| form.write().format_type = e.value(),
                        for (value, label) in FORMAT_OPTIONS {
                            option { value: "{value}", selected: f.format_type == value, "{label}" }
                        }
                    }
                }
                div { class: "field-row",
                    div { class: "field",
                        label { {t("sheet.date")} " *" }
                        input { r#type: "date", value: "{f.date}", oninput: move |e| form.write().date = e.value() }
                    }
                    div { class: "field",
                        label { {t("sheet.pat")} " *" }
                        input { r#type: "time", value: "{f.pat_time}", oninput: move |e| form.write().pat_time = e.value() }
                    }
                }
                div { class: "field",
                    label { {t("sheet.guest")} " *" }
                    input { r#type: "text", value: "{f.guest_name}", oninput: move |e| form.write().guest_name = e.value() }
                }
                div { class: "field",
                    label { {t("sheet.school")} }
                    input { r#type: "text", value: "{f.school_name}", oninput: move |e| form.write().school_name = e.value() }
                }

                div { class: "field-row",
                    div { class: "field autocomplete",
                        label { {t("sheet.manager_name")} " *" }
                        input {
                            r#type: "text",
                            autocomplete: "off",
                            value: "{f.manager_name}",
                            oninput: move |e| {
                                form.write().manager_name = e.value();
                                show_suggestions.set(true);
                            },
                            onfocus: move |_| show_suggestions.set(true),
                            onblur: move |_| show_suggestions.set(false),
                        }
                        if show_suggestions() && !suggestions.read().is_empty() {
                            ul { class: "suggestions",
                                for (i, m) in suggestions.read().iter().cloned().enumerate() {
                                    SuggestionItem {
                                        key: "{i}",
                                        record: m,
                                        on_pick: move |m: ManagerRecord| {
                                            let mut w = form.write();
                                            w.manager_name = m.name;
                                            w.manager_phone = m.phone;
                                            drop(w);
                                            show_suggestions.set(false);
                                        },
                                    }
                                }
                            }
                        }
                    }
                    div { class: "field",
                        label { {t("sheet.manager_phone")} " *" }
                        input { r#type: "tel", value: "{f.manager_phone}", oninput: move |e| form.write().manager_phone = e.value() }
                    }
                }

                label { class: "check",
                    input { r#type: "checkbox", checked: f.is_exterior, onchange: move |e| form.write().is_exterior = e.checked() }
                    {t("sheet.exterior")}
                }
                if f.is_exterior {
                    div { class: "field",
                        label { {t("sheet.exterior_address")} }
                        textarea { rows: "3", value: "{f.exterior_address}", oninput: move |e| form.write().exterior_address = e.value() }
                    }
                }

                label { class: "check",
                    input { r#type: "checkbox", checked: f.custom_schedule, onchange: move |e| form.write().custom_schedule = e.checked() }
                    {t("sheet.custom_schedule")}
                }
                if f.custom_schedule {
                    div { class: "field-grid",
                        div { class: "field",
                            label { {t("sheet.install")} }
                            input { r#type: "time", value: "{f.custom.install}", oninput: move |e| form.write().custom.install = e.value() }
                        }
                        div { class: "field",
                            label { {t("sheet.hair_makeup")} }
                            input { r#type: "time", value: "{f.custom.hair_makeup}", oninput: move |e| form.write().custom.hair_makeup = e.value() }
                        }
                        div { class: "field",
                            label { {t("sheet.meet")} }
                            input { r#type: "time", value: "{f.custom.meet}", oninput: move |e| form.write().custom.meet = e.value() }
                        }
                        div { class: "field",
                            label { {t("sheet.end")} }
                            input { r#type: "time", value: "{f.custom.end}", oninput: move |e| form.write().custom.end = e.value() }
                        }
                    }
                } else if !computed.install.is_empty() {
                    p { class: "muted",
                        {t_with("sheet.computed", &[("install", &computed.install), ("meet", &computed.meet), ("end", &computed.end)])}
                    }
                }

                div { class: "actions",
                    button { class: "btn btn-primary", onclick: on_print, {t("sheet.print")} }
                }
            }

            section { class: "card preview-card",
                h2 { class: "card-title", {t("sheet.preview")} }
                div { class: "preview", dangerous_inner_html: "{preview}" }
            }
        }
    }
}
