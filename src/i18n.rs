use dioxus::prelude::*;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Deserialize)]
struct Bundle(HashMap<String, String>);

static FR_JSON: &str = include_str!("../assets/i18n/fr.json");
static EN_JSON: &str = include_str!("../assets/i18n/en.json");

static BUNDLES: Lazy<HashMap<&'static str, Bundle>> = Lazy::new(|| {
    let mut m = HashMap::new();
    let parse = |name: &str, s: &str| {
        serde_json::from_str::<Bundle>(s).unwrap_or_else(|e| {
            tracing::error!(bundle = name, error = %e, "i18n bundle unreadable");
            Bundle(HashMap::new())
        })
    };
    m.insert("fr", parse("fr", FR_JSON));
    m.insert("en", parse("en", EN_JSON));
    m
});

#[derive(Clone, Debug, PartialEq)]
pub struct I18nState {
    pub lang: String, // "fr" | "en" | "system"
}

#[cfg(target_arch = "wasm32")]
fn detect_system_lang() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().language())
        .unwrap_or_else(|| "fr".into())
        .split('-')
        .next()
        .unwrap_or("fr")
        .to_lowercase()
}
#[cfg(not(target_arch = "wasm32"))]
fn detect_system_lang() -> String {
    std::env::var("LANG")
        .unwrap_or_else(|_| "fr".into())
        .split('.').next().unwrap_or("fr")
        .split('_').next().unwrap_or("fr")
        .to_lowercase()
}

fn normalize_lang(lang: &str) -> String {
    match lang { "system" | "fr" | "en" => lang.to_string(), _ => "fr".into() }
}

pub fn provide_i18n(initial_lang: &str) {
    let lang = normalize_lang(initial_lang);
    let sig: Signal<I18nState> = use_signal(|| I18nState { lang });
    provide_context(sig);
}

pub fn use_i18n() -> Signal<I18nState> { use_context::<Signal<I18nState>>() }

/// Translation in `lang`, then French (the sheet language), then the key itself.
pub fn lookup(lang: &str, key: &str) -> String {
    let bundles = &*BUNDLES;
    bundles
        .get(lang)
        .and_then(|b| b.0.get(key).cloned())
        .or_else(|| bundles.get("fr").and_then(|b| b.0.get(key).cloned()))
        .unwrap_or_else(|| key.to_string())
}

pub fn t(key: &str) -> String {
    let st = use_i18n().read().clone();
    let lang = if st.lang == "system" { detect_system_lang() } else { st.lang };
    lookup(&lang, key)
}

/// `t` with `{name}` placeholders replaced.
pub fn t_with(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |s, (name, value)| s.replace(&format!("{{{name}}}"), value))
}

pub fn set_lang(new_lang: &str) {
    let mut sig = use_i18n();
    sig.write().lang = normalize_lang(new_lang);
}
