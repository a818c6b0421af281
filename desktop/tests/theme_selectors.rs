#![cfg(test)]
//! Selector lint for the shared theme.
//!
//! Components in `ui` reference these classes directly. If one is renamed in
//! markup, rename it here and in `ui/assets/theme/main.css` together.

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".visually-hidden",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Cards
    ".chart-card {",
    ".chart-card__header",
    ".chart-card__meta",
    ".chart-card__meta--success",
    ".chart-card__meta--error",
    // Form
    ".chart-form__columns",
    ".chart-form__column",
    ".chart-form__column-title",
    ".chart-form__title",
    ".chart-form__toggles",
    ".chart-form__choices",
    ".chart-form__choice",
    ".chart-form__actions",
    ".chart-form__error",
    // Preview & derived table
    ".chart-preview__canvas",
    ".chart-preview__notice",
    ".chart-preview__data",
    ".chart-table",
    ".chart-table__bucket",
    // Export panel
    ".chart-export__actions",
    // Guide
    ".page-guide__rules",
    ".swatch--red",
    ".swatch--amber",
    ".swatch--green",
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<_> = REQUIRED_SELECTORS
        .iter()
        .filter(|sel| !THEME_CSS.contains(**sel))
        .copied()
        .collect();

    assert!(
        missing.is_empty(),
        "Missing {} required CSS selectors/tokens in unified theme:\n{}",
        missing.len(),
        missing.join("\n")
    );
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}

#[test]
fn status_colours_match_chart_palette() {
    for colour in ["#008000", "#ffa500", "#ff0000"] {
        assert!(THEME_CSS.contains(colour), "theme lacks status colour {colour}");
    }
}
