//! Application header: brand, localized route links and the language picker.

use dioxus::prelude::*;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::i18n;
use crate::t;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Route links supplied by a launcher crate, which owns the `Route` enum.
///
/// Each function wraps the already-localized label in a `Link`:
///
/// ```ignore
/// register_nav(NavBuilder {
///     generator: |label| rsx!( Link { class: "navbar__link", to: Route::Generator {}, "{label}" } ),
///     guide: |label| rsx!( Link { class: "navbar__link", to: Route::Guide {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub generator: fn(label: &str) -> Element,
    pub guide: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// Install the launcher's links. Only the first registration is kept.
pub fn register_nav(builder: NavBuilder) {
    if NAV_BUILDER.set(builder).is_err() {
        debug!("navigation already registered");
    }
}

/// Header bar. Renders registered links, or `children` when no builder exists.
#[component]
pub fn AppNavbar(children: Element) -> Element {
    i18n::init();

    // Subscribing to the launcher's language signal re-renders labels on switch.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code.as_ref().map(|code| code()).unwrap_or_default();

    let links = match NAV_BUILDER.get() {
        Some(builder) => rsx! {
            nav { class: "navbar__links",
                {(builder.generator)(&t!("nav-generator"))}
                {(builder.guide)(&t!("nav-guide"))}
            }
        },
        None => rsx! {
            nav { class: "navbar__links", {children} }
        },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header { id: "navbar", class: "navbar", "data-lang": "{lang_marker}",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "KPI Board" }
                    }
                    span { class: "navbar__brand-subtitle", {t!("tagline")} }
                }
                {links}
                LocaleSwitcher {}
            }
        }
    }
}

/// Language `<select>`; hidden when only one locale is bundled.
#[component]
fn LocaleSwitcher() -> Element {
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let languages = use_hook(i18n::available_languages);
    let mut selected = use_signal(i18n::current_language);

    if languages.len() < 2 {
        return rsx! {};
    }

    let on_change = move |evt: FormEvent| {
        let tag = evt.value();
        match i18n::set_language(&tag) {
            Ok(()) => {
                debug!(%tag, "language switched");
                selected.set(tag.clone());
                if let Some(mut code) = lang_code {
                    code.set(tag);
                }
            }
            Err(err) => warn!(%tag, %err, "language switch failed"),
        }
    };

    rsx! {
        div { class: "navbar__locale",
            label { class: "visually-hidden", r#for: "locale-select", {t!("nav-language-label")} }
            select {
                id: "locale-select",
                value: "{selected}",
                oninput: on_change,
                for tag in languages {
                    option { key: "{tag}", value: "{tag}", {i18n::language_name(&tag).to_string()} }
                }
            }
        }
    }
}
