use dioxus::prelude::*;

mod callsheet;
mod managers;
mod settings;

pub use callsheet::CallSheet;
pub use managers::Managers;
pub use settings::Settings;

/// Browser alert on the web; the inline banner elsewhere (or if no window).
pub(crate) fn notify_error(mut banner: Signal<Option<String>>, message: String) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(win) = web_sys::window() {
            let _ = win.alert_with_message(&message);
            return;
        }
    }
    banner.set(Some(message));
}

#[component]
pub(crate) fn Banner(message: Signal<Option<String>>, kind: &'static str) -> Element {
    let mut message = message;
    let Some(text) = message() else { return rsx! {} };
    rsx! {
        div { class: "banner banner-{kind}",
            span { "{text}" }
            button { class: "banner-close", onclick: move |_| message.set(None), "×" }
        }
    }
}
