use crate::i18n::t;
use crate::Route;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;

//Icons
use dioxus_free_icons::icons::hi_solid_icons::{HiCog, HiDocumentText, HiUserGroup};

#[component]
pub fn Navbar() -> Element {
    rsx! {
        header { class: "topbar",
            span { class: "brand", "Easy Call Sheets" }
            nav { class: "topnav",
                Link { to: Route::CallSheet {}, class: "navlink", active_class: "active",
                    Icon { width: 18, height: 18, fill: "currentColor", icon: HiDocumentText }
                    span { {t("nav.callsheet")} }
                }
                Link { to: Route::Managers {}, class: "navlink", active_class: "active",
                    Icon { width: 18, height: 18, fill: "currentColor", icon: HiUserGroup }
                    span { {t("nav.managers")} }
                }
                Link { to: Route::Settings {}, class: "navlink", active_class: "active",
                    Icon { width: 18, height: 18, fill: "currentColor", icon: HiCog }
                    span { {t("nav.settings")} }
                }
            }
        }
        main { class: "content",
            Outlet::<Route> {}
        }
    }
}
