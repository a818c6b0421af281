use dioxus::prelude::*;

use crate::core::config::{ChartConfig, CSV_FILENAME, JSON_FILENAME, PNG_FILENAME};
use crate::core::platform::Platform;
use crate::t;

#[component]
pub fn Guide() -> Element {
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_current = _lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let max_rows = try_use_context::<ChartConfig>()
        .unwrap_or_default()
        .max_rows;
    let delivery = if Platform::current().saves_to_disk() {
        t!("guide-export-desktop")
    } else {
        t!("guide-export-web")
    };

    rsx! {
        section { class: "page page-guide",
            h1 { {t!("guide-title")} }
            p { {t!("guide-intro")} }

            h2 { {t!("guide-columns-title")} }
            ul { class: "page-guide__rules",
                li { {t!("guide-rule-lines")} }
                li { {t!("guide-rule-score")} }
                li { {t!("guide-rule-counts")} }
                li { {t!("guide-rule-lengths")} }
                li { {t!("guide-rule-limit", limit = max_rows)} }
            }

            h2 { {t!("guide-buckets-title")} }
            ul { class: "page-guide__buckets",
                li { span { class: "swatch swatch--red" } {t!("guide-bucket-low")} }
                li { span { class: "swatch swatch--amber" } {t!("guide-bucket-medium")} }
                li { span { class: "swatch swatch--green" } {t!("guide-bucket-high")} }
            }

            h2 { {t!("guide-export-title")} }
            p { "{delivery}" }
            ul { class: "page-guide__files",
                li { code { "{PNG_FILENAME}" } }
                li { code { "{CSV_FILENAME}" } }
                li { code { "{JSON_FILENAME}" } }
            }
        }
    }
}
