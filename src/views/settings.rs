use dioxus::prelude::*;

use crate::db;
use crate::directory::ManagerDirectory;
use crate::i18n::{set_lang, t, t_with};
use crate::settings::SheetSettings;
use crate::views::{notify_error, Banner};

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect()
}

#[component]
pub fn Settings() -> Element {
    let mut settings = use_context::<Signal<SheetSettings>>();
    let mut directory = use_context::<Signal<ManagerDirectory>>();
    let mut draft = use_signal(|| settings.peek().clone());
    let banner = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut confirm_reset = use_signal(|| false);

    let on_save = move |_| {
        let next = draft.read().clone();
        match db::save_settings(&next) {
            Ok(()) => {
                set_lang(&next.language);
                settings.set(next);
                notice.set(Some(t("settings.saved")));
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings not persisted");
                notify_error(banner, t_with("common.error", &[("error", &e.to_string())]));
            }
        }
    };

    let on_reset = move |_| {
        confirm_reset.set(false);
        if let Err(e) = db::reset_data() {
            notify_error(banner, t_with("common.error", &[("error", &e.to_string())]));
            return;
        }
        settings.set(SheetSettings::default());
        draft.set(SheetSettings::default());
        directory.set(ManagerDirectory::new());
        set_lang("system");
        notice.set(Some(t("settings.reset_done")));
    };

    let d = draft.read().clone();
    let venue = d.default_venue.join("\n");
    let wardrobe = d.wardrobe_notes.join("\n");

    rsx! {
        div { class: "page",
            section { class: "card",
                h1 { class: "card-title", {t("settings.title")} }
                Banner { message: banner, kind: "error" }
                Banner { message: notice, kind: "info" }

                div { class: "field",
                    label { {t("settings.language")} }
                    select {
                        value: "{d.language}",
                        onchange: move |e| draft.write().language = e.value(),
                        option { value: "system", selected: d.language == "system", {t("settings.lang_system")} }
                        option { value: "fr", selected: d.language == "fr", "Français" }
                        option { value: "en", selected: d.language == "en", "English" }
                    }
                }
                div { class: "field",
                    label { {t("settings.brand")} }
                    input { r#type: "text", value: "{d.brand}", oninput: move |e| draft.write().brand = e.value() }
                }
                div { class: "field",
                    label { {t("settings.logo")} }
                    input { r#type: "text", value: "{d.logo_path}", oninput: move |e| draft.write().logo_path = e.value() }
                }
                div { class: "field",
                    label { {t("settings.venue")} }
                    textarea { rows: "2", value: "{venue}", oninput: move |e| draft.write().default_venue = lines(&e.value()) }
                }

                h2 { class: "section-title", {t("settings.contact")} }
                div { class: "field-grid",
                    div { class: "field",
                        label { {t("settings.contact_name")} }
                        input { r#type: "text", value: "{d.secondary_contact.name}", oninput: move |e| draft.write().secondary_contact.name = e.value() }
                    }
                    div { class: "field",
                        label { {t("settings.contact_role")} }
                        input { r#type: "text", value: "{d.secondary_contact.role}", oninput: move |e| draft.write().secondary_contact.role = e.value() }
                    }
                    div { class: "field",
                        label { {t("settings.contact_phone")} }
                        input { r#type: "tel", value: "{d.secondary_contact.phone}", oninput: move |e| draft.write().secondary_contact.phone = e.value() }
                    }
                }

                div { class: "field",
                    label { {t("settings.wardrobe")} }
                    textarea { rows: "4", value: "{wardrobe}", oninput: move |e| draft.write().wardrobe_notes = lines(&e.value()) }
                }

                h2 { class: "section-title", {t("settings.print")} }
                div { class: "field-grid",
                    div { class: "field",
                        label { {t("settings.settle_ms")} }
                        input {
                            r#type: "number",
                            min: "0",
                            value: "{d.print.settle_ms}",
                            oninput: move |e| if let Ok(v) = e.value().parse() { draft.write().print.settle_ms = v },
                        }
                    }
                    div { class: "field",
                        label { {t("settings.fallback_ms")} }
                        input {
                            r#type: "number",
                            min: "0",
                            value: "{d.print.fallback_ms}",
                            oninput: move |e| if let Ok(v) = e.value().parse() { draft.write().print.fallback_ms = v },
                        }
                    }
                    div { class: "field",
                        label { {t("settings.close_ms")} }
                        input {
                            r#type: "number",
                            min: "0",
                            value: "{d.print.close_ms}",
                            oninput: move |e| if let Ok(v) = e.value().parse() { draft.write().print.close_ms = v },
                        }
                    }
                }

                div { class: "actions",
                    button { class: "btn btn-danger", onclick: move |_| confirm_reset.set(true), {t("settings.reset")} }
                    button { class: "btn btn-primary", onclick: on_save, {t("common.save")} }
                }
            }
        }

        {confirm_reset().then(|| rsx! {
            div { class: "modal-backdrop",
                div { class: "modal",
                    h2 { class: "modal-title", {t("settings.confirm_reset_title")} }
                    p { {t("settings.confirm_reset_message")} }
                    div { class: "modal-actions",
                        button { class: "btn", onclick: move |_| confirm_reset.set(false), {t("common.cancel")} }
                        button { class: "btn btn-danger", onclick: on_reset, {t("settings.reset")} }
                    }
                }
            }
        })}
    }
}
