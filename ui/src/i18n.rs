//! Localized strings for the KPI Board UI.
//!
//! Messages live in `i18n/<lang>/kpiboard-ui.ftl` and are embedded at compile
//! time with `rust-embed`. `en-US` is the fallback; `es-ES` and `fr-FR` must
//! carry the same message IDs and placeholders (see `tests/i18n_missing_keys.rs`).
//!
//! Call [`init`] once at startup, then look strings up with [`t!`](crate::t).
//! The initial language comes from the OS locale list on desktop and
//! `navigator.languages` in the browser.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use i18n_embed::LanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Look up a message through the shared [`LOADER`]:
/// `t!("nav-generator")`, `t!("guide-rule-limit", limit = 200)`.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

const DOMAIN: &str = "kpiboard-ui";

/// Language used when none of the requested ones is bundled.
pub const FALLBACK_LANGUAGE: &str = "en-US";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = FALLBACK_LANGUAGE
        .parse()
        .expect("fallback language tag is valid");
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

/// Select the best bundled language for the user's locale list. Idempotent.
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        match i18n_embed::select(&*LOADER, &Localizations, &requested) {
            Ok(selected) => debug!(?selected, "localization bundles loaded"),
            Err(err) => warn!(%err, "failed selecting languages; continuing with fallback"),
        }
    });
}

/// Tag of the language currently used for lookups.
pub fn current_language() -> String {
    LOADER.current_language().to_string()
}

/// Switch to `tag` at runtime. Tags that do not parse or are not bundled
/// leave the current language in place.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(lang) = tag.parse::<LanguageIdentifier>() else {
        debug!(tag, "ignoring unparsable language tag");
        return Ok(());
    };
    if !available_languages().iter().any(|known| known == tag) {
        debug!(tag, "ignoring language without bundled messages");
        return Ok(());
    }
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// Bundled language tags, sorted.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

/// Name of a bundled language in that language, for the switcher.
pub fn language_name(tag: &str) -> &str {
    match tag {
        "en-US" => "English",
        "es-ES" => "Español",
        "fr-FR" => "Français",
        other => other,
    }
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_locale_is_listed() {
        let langs = available_languages();
        for tag in ["en-US", "es-ES", "fr-FR"] {
            assert!(langs.iter().any(|l| l == tag), "missing {tag}");
        }
        assert!(langs.iter().any(|l| l == FALLBACK_LANGUAGE));
    }

    #[test]
    fn fallback_lookup_works() {
        init();
        set_language(FALLBACK_LANGUAGE).unwrap();
        assert_eq!(current_language(), "en-US");
        assert_eq!(fl!(&*LOADER, "nav-generator"), "Generator");
    }

    #[test]
    fn unknown_or_malformed_tags_keep_current_language() {
        init();
        set_language(FALLBACK_LANGUAGE).unwrap();
        let before = current_language();
        set_language("zz-ZZ").unwrap();
        set_language("not a tag").unwrap();
        assert_eq!(current_language(), before);
    }

    #[test]
    fn switcher_names_are_endonyms() {
        assert_eq!(language_name("fr-FR"), "Français");
        assert_eq!(language_name("de-DE"), "de-DE");
    }
}
