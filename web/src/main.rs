use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::ChartConfig;
use ui::views::{Generator, Guide};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Generator {},
    #[route("/guide")]
    Guide {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_generator(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Generator {},
        "{label}"
    })
}
fn nav_guide(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Guide {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        generator: nav_generator,
        guide: nav_guide,
    });

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);
    use_context_provider(ChartConfig::default);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        div {
            key: "{lang_code()}",
            Router::<Route> {}
        }
    }
}

/// Web-specific layout so the shared navbar can sit above this crate's `Route` outlet.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
