use dioxus::prelude::*;

use crate::chart::ChartForm;
use crate::t;

#[component]
pub fn Generator() -> Element {
    // Re-render on language change when the launcher provides the language signal.
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_current = _lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        section { class: "page page-generator",
            h1 { {t!("generator-title")} }
            p { {t!("generator-intro")} }

            ChartForm {}
        }
    }
}
