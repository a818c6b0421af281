#![cfg(test)]
//! The desktop build inlines `ui/assets/theme/main.css`; a broken path or a
//! truncated file would only show up as an unstyled window at runtime.

const EMBEDDED_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/styling/navbar.css"
));

#[test]
fn embedded_css_file_exists_and_is_not_empty() {
    assert!(!EMBEDDED_CSS.trim().is_empty(), "embedded theme is empty");
    assert!(!NAVBAR_CSS.trim().is_empty(), "navbar stylesheet is empty");
}

#[test]
fn embedded_css_contains_expected_tokens() {
    let required = ["--color-bg", "--color-amber", "body {", ".button--primary"];
    for token in required {
        assert!(
            EMBEDDED_CSS.contains(token),
            "Expected token `{token}` missing from embedded CSS"
        );
    }
}

#[test]
fn navbar_styles_cover_brand_and_links() {
    for token in [".navbar {", ".navbar__brand-mark", ".navbar__link", ".navbar__locale"] {
        assert!(NAVBAR_CSS.contains(token), "navbar.css lacks `{token}`");
    }
}
