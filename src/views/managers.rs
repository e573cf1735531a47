use dioxus::prelude::*;

use crate::db;
use crate::directory::{AddOutcome, ManagerDirectory, ManagerRecord};
use crate::error::CallSheetError;
use crate::i18n::{t, t_with};
use crate::views::{notify_error, Banner};

const EXPORT_FILE: &str = "responsables_easycallsheets.csv";

#[derive(Clone, PartialEq)]
enum ConfirmAction {
    Overwrite { index: usize, phone: String },
    Delete(usize),
    Clear,
}

#[derive(Clone, PartialEq, Default)]
struct ManagerForm { index: Option<usize>, name: String, phone: String }

/// `error_template` is resolved by the caller: this also runs from FileReader
/// callbacks, outside the component scope.
fn persist(directory: &ManagerDirectory, banner: Signal<Option<String>>, error_template: &str) {
    if let Err(e) = db::save_managers(directory) {
        tracing::warn!(error = %e, "managers not persisted");
        notify_error(banner, error_text(error_template, &e));
    }
}

fn error_text(template: &str, e: &CallSheetError) -> String {
    template.replace("{error}", &e.to_string())
}

/// `None` when there is nothing to export.
fn export_text(directory: &ManagerDirectory) -> Option<String> {
    (!directory.is_empty()).then(|| directory.export_delimited())
}

fn imported_message(template: &str, count: usize) -> String {
    template.replace("{count}", &count.to_string())
}

#[component]
pub fn Managers() -> Element {
    let mut directory = use_context::<Signal<ManagerDirectory>>();
    let mut query = use_signal(String::new);
    let mut modal_open = use_signal(|| false);
    let mut form = use_signal(ManagerForm::default);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut confirm_action = use_signal(|| Option::<ConfirmAction>::None);
    let banner = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    #[allow(unused_mut)]
    let mut importing = use_signal(|| false);

    let mut open_create = move || {
        form.set(ManagerForm::default());
        form_error.set(None);
        modal_open.set(true);
    };

    let on_save = move |_| {
        let f = form.read().clone();
        let saved = match f.index {
            Some(i) => directory.write().update(i, &f.name, &f.phone).map(|_| true),
            None => match directory.write().add(&f.name, &f.phone) {
                Ok(AddOutcome::Added) => Ok(true),
                Ok(AddOutcome::Duplicate { index }) => {
                    confirm_action.set(Some(ConfirmAction::Overwrite { index, phone: f.phone.trim().to_string() }));
                    Ok(false)
                }
                Err(e) => Err(e),
            },
        };
        match saved {
            Ok(true) => {
                persist(&directory.read(), banner, &t("common.error"));
                modal_open.set(false);
                form.set(ManagerForm::default());
            }
            Ok(false) => {}
            Err(CallSheetError::MissingManagerFields) => form_error.set(Some(t("managers.required"))),
            Err(e) => form_error.set(Some(t_with("common.error", &[("error", &e.to_string())]))),
        }
    };

    let on_confirm = move |_| {
        let Some(action) = confirm_action.write().take() else { return };
        let applied = match action {
            ConfirmAction::Overwrite { index, phone } => directory.write().overwrite_phone(index, &phone),
            ConfirmAction::Delete(index) => {
                if let Some(m) = directory.write().remove(index) {
                    tracing::info!(name = %m.name, "manager removed");
                }
                Ok(())
            }
            ConfirmAction::Clear => {
                directory.write().clear();
                Ok(())
            }
        };
        match applied {
            Ok(()) => {
                persist(&directory.read(), banner, &t("common.error"));
                modal_open.set(false);
                form.set(ManagerForm::default());
            }
            Err(e) => notify_error(banner, t_with("common.error", &[("error", &e.to_string())])),
        }
    };

    let on_export = move |_| {
        let Some(text) = export_text(&directory.read()) else {
            notify_error(banner, t("managers.nothing_to_export"));
            return;
        };
        #[cfg(target_arch = "wasm32")]
        {
            use web_sys::wasm_bindgen::JsCast;
            if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
                if let Ok(a) = doc.create_element("a") {
                    let href = format!("data:text/csv;charset=utf-8,{}", urlencoding::encode(&text));
                    a.set_attribute("href", &href).ok();
                    a.set_attribute("download", EXPORT_FILE).ok();
                    if let Ok(ae) = a.dyn_into::<web_sys::HtmlElement>() { ae.click(); }
                }
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let path = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join(EXPORT_FILE);
            match std::fs::write(&path, text) {
                Ok(()) => notice.set(Some(t_with("managers.exported", &[("path", &path.display().to_string())]))),
                Err(e) => notify_error(banner, t_with("common.error", &[("error", &e.to_string())])),
            }
        }
    };

    // Web: the hidden file input is read with a FileReader. Native: the export
    // file in the working directory is read back.
    let mut on_import = move || {
        notice.set(None);
        let template = t("managers.imported");
        let failed = t("managers.import_failed");
        let save_failed = t("common.error");
        #[cfg(target_arch = "wasm32")]
        {
            use web_sys::wasm_bindgen::closure::Closure;
            use web_sys::wasm_bindgen::JsCast;
            use web_sys::{window, Event, FileReader, HtmlInputElement};

            let input = window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.get_element_by_id("importCsv"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
            let Some(input) = input else { return };
            let Some(file) = input.files().and_then(|files| files.get(0)) else { return };
            // the same file can be picked again once edited
            input.set_value("");
            let reader = match FileReader::new() {
                Ok(r) => r,
                Err(_) => {
                    notify_error(banner, failed);
                    return;
                }
            };
            importing.set(true);
            let fr_c = reader.clone();
            let onload = Closure::wrap(Box::new(move |_e: Event| {
                let text = fr_c.result().ok().and_then(|v| v.as_string()).unwrap_or_default();
                let added = directory.write().import_delimited(&text);
                if added > 0 {
                    persist(&directory.read(), banner, &save_failed);
                }
                tracing::info!(added, "managers imported");
                notice.set(Some(imported_message(&template, added)));
                importing.set(false);
            }) as Box<dyn FnMut(_)>);
            let onerror = Closure::wrap(Box::new(move |_e: Event| {
                tracing::warn!("import file could not be read");
                notify_error(banner, failed.clone());
                importing.set(false);
            }) as Box<dyn FnMut(_)>);
            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onload.forget();
            onerror.forget();
            if reader.read_as_text(&file).is_err() {
                importing.set(false);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let path = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join(EXPORT_FILE);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let added = directory.write().import_delimited(&text);
                    if added > 0 {
                        persist(&directory.read(), banner, &save_failed);
                    }
                    tracing::info!(added, path = %path.display(), "managers imported");
                    notice.set(Some(imported_message(&template, added)));
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "import file could not be read");
                    notify_error(banner, failed);
                }
            }
        }
    };

    let on_import_click = move |_| {
        #[cfg(target_arch = "wasm32")]
        {
            use web_sys::wasm_bindgen::JsCast;
            if let Some(input) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.get_element_by_id("importCsv"))
                .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            {
                input.click();
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            on_import();
        }
    };

    let rows: Vec<(usize, ManagerRecord)> = {
        let q = query.read().to_lowercase();
        directory
            .read()
            .list()
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, m)| q.is_empty() || m.name.to_lowercase().contains(&q))
            .collect()
    };
    let total = directory.read().len();

    rsx! {
        div { class: "page",
            section { class: "card",
                div { class: "card-header",
                    h1 { class: "card-title", {t("managers.title")} " ({total})" }
                    div { class: "toolbar",
                        button { class: "btn btn-primary", onclick: move |_| open_create(), {t("managers.add")} }
                        button { class: "btn", disabled: importing(), onclick: on_import_click, {t("managers.import")} }
                        button { class: "btn", onclick: on_export, {t("managers.export")} }
                        button {
                            class: "btn btn-danger",
                            disabled: total == 0,
                            onclick: move |_| confirm_action.set(Some(ConfirmAction::Clear)),
                            {t("managers.clear")}
                        }
                    }
                }
                input {
                    id: "importCsv",
                    r#type: "file",
                    accept: ".csv,.txt",
                    class: "hidden",
                    onchange: move |_| on_import(),
                }
                Banner { message: banner, kind: "error" }
                Banner { message: notice, kind: "info" }

                input {
                    class: "search",
                    r#type: "search",
                    placeholder: t("managers.search"),
                    value: "{query}",
                    oninput: move |e| query.set(e.value()),
                }

                if rows.is_empty() {
                    p { class: "muted", {t("managers.empty")} }
                } else {
                    table { class: "table",
                        thead {
                            tr {
                                th { {t("managers.name")} }
                                th { {t("managers.phone")} }
                                th {}
                            }
                        }
                        tbody {
                            for (index, m) in rows.into_iter() {
                                tr { key: "{index}",
                                    td { "{m.name}" }
                                    td { "{m.phone}" }
                                    td { class: "row-actions",
                                        button {
                                            class: "btn btn-small",
                                            onclick: move |_| {
                                                let Some(m) = directory.read().list().get(index).cloned() else { return };
                                                form.set(ManagerForm { index: Some(index), name: m.name, phone: m.phone });
                                                form_error.set(None);
                                                modal_open.set(true);
                                            },
                                            {t("common.edit")}
                                        }
                                        button {
                                            class: "btn btn-small btn-danger",
                                            onclick: move |_| confirm_action.set(Some(ConfirmAction::Delete(index))),
                                            {t("common.delete")}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        {modal_open().then(|| rsx! {
            div { class: "modal-backdrop",
                div { class: "modal",
                    h2 { class: "modal-title",
                        if form.read().index.is_some() { {t("managers.edit")} } else { {t("managers.add")} }
                    }
                    if let Some(err) = form_error() {
                        div { class: "banner banner-error", "{err}" }
                    }
                    div { class: "field",
                        label { {t("managers.name")} }
                        input { r#type: "text", value: "{form.read().name}", oninput: move |e| form.write().name = e.value() }
                    }
                    div { class: "field",
                        label { {t("managers.phone")} }
                        input { r#type: "tel", value: "{form.read().phone}", oninput: move |e| form.write().phone = e.value() }
                    }
                    div { class: "modal-actions",
                        button { class: "btn", onclick: move |_| modal_open.set(false), {t("common.cancel")} }
                        button { class: "btn btn-primary", onclick: on_save, {t("common.save")} }
                    }
                }
            }
        })}

        if let Some(action) = confirm_action() {
            div { class: "modal-backdrop",
                div { class: "modal",
                    h2 { class: "modal-title",
                        {match &action {
                            ConfirmAction::Overwrite { .. } => t("managers.confirm_overwrite_title"),
                            ConfirmAction::Delete(_) => t("managers.confirm_delete_title"),
                            ConfirmAction::Clear => t("managers.confirm_clear_title"),
                        }}
                    }
                    p {
                        {confirm_message(&action, &directory.read())}
                    }
                    div { class: "modal-actions",
                        button { class: "btn", onclick: move |_| confirm_action.set(None), {t("common.cancel")} }
                        button { class: "btn btn-danger", onclick: on_confirm, {t("common.confirm")} }
                    }
                }
            }
        }
    }
}

fn confirm_message(action: &ConfirmAction, directory: &ManagerDirectory) -> String {
    let name_at = |i: usize| directory.list().get(i).map(|m| m.name.clone()).unwrap_or_default();
    match action {
        ConfirmAction::Overwrite { index, phone } => {
            let old = directory.list().get(*index).map(|m| m.phone.clone()).unwrap_or_default();
            t_with("managers.confirm_overwrite_message", &[("name", &name_at(*index)), ("old", &old), ("new", phone)])
        }
        ConfirmAction::Delete(index) => t_with("managers.confirm_delete_message", &[("name", &name_at(*index))]),
        ConfirmAction::Clear => t_with("managers.confirm_clear_message", &[("count", &directory.len().to_string())]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imported_count_is_substituted() {
        assert_eq!(imported_message("{count} imported", 3), "3 imported");
    }

    #[test]
    fn empty_directory_has_nothing_to_export() {
        assert_eq!(export_text(&ManagerDirectory::default()), None);
        let dir = ManagerDirectory::from_records(vec![ManagerRecord::new("Alice", "06 11")]);
        assert_eq!(export_text(&dir), Some(dir.export_delimited()));
    }

    #[test]
    fn storage_error_uses_the_resolved_template() {
        let e = CallSheetError::Storage("quota exceeded".into());
        assert_eq!(error_text("Erreur : {error}", &e), format!("Erreur : {e}"));
    }
}
