//! Font measurement for chart layout.
//!
//! The SVG renderer needs text extents to size margins: the longest category
//! label decides how much room the rotated tick labels take, and legend
//! entries are spaced by their label width.
//!
//! With the `embed_inter` feature the Inter variable font is embedded and
//! measured through `fontdue`; it is also handed to the PNG rasterizer so the
//! export uses the same face. Without it we fall back to heuristic metrics
//! tuned for a generic sans-serif, which is close enough for margin sizing.
//!
//! Expected font file location (relative to this file):
//! - ../../assets/Inter-Variable.ttf

use once_cell::sync::Lazy;

#[cfg(feature = "embed_inter")]
use fontdue::Font;

/// Font family written into the SVG; matches the embedded face when present.
pub const FONT_FAMILY: &str = "Inter, 'DejaVu Sans', Arial, sans-serif";

#[cfg(feature = "embed_inter")]
pub const EMBEDDED_FONT: Option<&[u8]> = Some(include_bytes!("../../assets/Inter-Variable.ttf"));

#[cfg(not(feature = "embed_inter"))]
pub const EMBEDDED_FONT: Option<&[u8]> = None;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    pub fn css(self) -> &'static str {
        match self {
            FontWeight::Regular => "400",
            FontWeight::Bold => "700",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TextMetrics {
    /// Chosen vertical line height for layout rhythm.
    pub line_h: f64,
    /// Estimated ascender distance above baseline.
    pub asc: f64,
    /// Estimated descender distance below baseline (positive number).
    pub desc: f64,
}

pub struct Fonts {
    #[cfg(feature = "embed_inter")]
    variable: Option<Font>,
}

impl Fonts {
    pub fn load() -> Self {
        #[cfg(feature = "embed_inter")]
        {
            let variable = EMBEDDED_FONT.and_then(|bytes| {
                Font::from_bytes(bytes, Default::default())
                    .map_err(|err| tracing::warn!(%err, "embedded font unusable; using heuristic metrics"))
                    .ok()
            });
            Fonts { variable }
        }
        #[cfg(not(feature = "embed_inter"))]
        {
            Fonts {}
        }
    }

    pub fn metrics(&self, weight: FontWeight, size_px: f64) -> TextMetrics {
        let _ = weight;
        let line_h = (size_px * 1.28).round();
        let asc = (size_px * 0.92).round();
        let desc = (line_h - asc).max(size_px * 0.08).round();
        TextMetrics { line_h, asc, desc }
    }

    /// Horizontal advance of `text` set at `size_px`.
    pub fn width(&self, weight: FontWeight, size_px: f64, text: &str) -> f64 {
        #[cfg(feature = "embed_inter")]
        {
            if let Some(font) = &self.variable {
                let advance: f32 = text
                    .chars()
                    .map(|ch| font.metrics(ch, size_px as f32).advance_width)
                    .sum();
                let bold_factor = if weight == FontWeight::Bold { 1.05 } else { 1.0 };
                return f64::from(advance) * bold_factor;
            }
        }

        let ems: f64 = text.chars().map(heuristic_advance).sum();
        let bold_factor = if weight == FontWeight::Bold { 1.08 } else { 1.0 };
        ems * size_px * bold_factor
    }
}

/// Approximate advance in ems for a proportional sans-serif.
fn heuristic_advance(ch: char) -> f64 {
    match ch {
        ' ' | 'i' | 'l' | 'j' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 0.86,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.56,
        _ => 0.54,
    }
}

static FONTS: Lazy<Fonts> = Lazy::new(Fonts::load);

pub fn measure(weight: FontWeight, size_px: f64) -> TextMetrics {
    FONTS.metrics(weight, size_px)
}

pub fn text_width(weight: FontWeight, size_px: f64, text: &str) -> f64 {
    FONTS.width(weight, size_px, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_increase_with_size() {
        let small = measure(FontWeight::Regular, 12.0);
        let large = measure(FontWeight::Regular, 48.0);
        assert!(large.line_h > small.line_h);
        assert!(large.asc > small.asc);
    }

    #[test]
    fn width_grows_with_text_and_size() {
        let short = text_width(FontWeight::Regular, 14.0, "Uptime");
        let long = text_width(FontWeight::Regular, 14.0, "Uptime and availability");
        let big = text_width(FontWeight::Regular, 28.0, "Uptime");
        assert!(long > short);
        assert!(big > short * 1.9);
        assert_eq!(text_width(FontWeight::Bold, 14.0, ""), 0.0);
    }

    #[test]
    fn bold_is_wider() {
        let regular = text_width(FontWeight::Regular, 20.0, "Average Score");
        let bold = text_width(FontWeight::Bold, 20.0, "Average Score");
        assert!(bold > regular);
    }
}
