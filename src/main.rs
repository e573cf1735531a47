#![cfg_attr(feature = "bundle", windows_subsystem = "windows")]

use dioxus::prelude::*;

use components::Navbar;
use directory::ManagerDirectory;
use form::FormState;
use prefill::{prefill, QueryParams};
use views::{CallSheet, Managers, Settings};

mod components;
mod db; // storage facade (localStorage, sqlite or in-process)
mod directory;
mod error;
mod form;
mod i18n;
mod prefill;
mod print;
mod render;
mod schedule;
mod settings;
mod title;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
        #[route("/")]
        CallSheet {},
        #[route("/managers")]
        Managers {},
        #[route("/settings")]
        Settings {},
}

fn main() {
    #[cfg(all(feature = "native-db", not(target_arch = "wasm32")))]
    install_panic_hook();
    dioxus::launch(App);
}

#[cfg(all(feature = "native-db", not(target_arch = "wasm32")))]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        use std::fs::{create_dir_all, OpenOptions};
        use std::io::Write;
        let mut base = dirs_next::cache_dir().or_else(dirs_next::data_local_dir).unwrap_or_else(std::env::temp_dir);
        base.push("easy_callsheets");
        let _ = create_dir_all(&base);
        let file = OpenOptions::new().create(true).append(true).open(base.join("panic.log"));
        if let Ok(mut f) = file {
            let _ = writeln!(f, "{} | PANIC: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"), info);
        }
    }));
}

#[cfg(target_arch = "wasm32")]
fn today() -> String {
    let d = js_sys::Date::new_0();
    format!("{:04}-{:02}-{:02}", d.get_full_year(), d.get_month() + 1, d.get_date())
}
#[cfg(not(target_arch = "wasm32"))]
fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(target_arch = "wasm32")]
fn query_string() -> String {
    web_sys::window().and_then(|w| w.location().search().ok()).unwrap_or_default()
}
// Desktop: first argument, either a bare query or a full link
#[cfg(not(target_arch = "wasm32"))]
fn query_string() -> String {
    let arg = std::env::args().nth(1).unwrap_or_default();
    match arg.split_once('?') {
        Some((_, query)) => query.to_string(),
        None => arg,
    }
}

fn initial_form(directory: &ManagerDirectory) -> FormState {
    let mut form = FormState::with_date(today());
    let params = QueryParams::parse(&query_string());
    if !params.is_empty() {
        let report = prefill(&params, directory, &mut form);
        tracing::info!(filled = report.filled.len(), rejected = report.rejected.len(), "form pre-filled from link");
    }
    form
}

#[component]
fn App() -> Element {
    let settings = use_signal(db::load_settings);
    let directory = use_signal(db::load_managers);
    let form = use_signal(|| initial_form(&directory.peek()));
    provide_context(settings);
    provide_context(directory);
    provide_context(form);
    i18n::provide_i18n(&settings.peek().language);

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        document::Title { "Easy Call Sheets" }
        Router::<Route> {}
    }
}
