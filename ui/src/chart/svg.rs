//! SVG chart renderer.
//!
//! Turns a [`RenderPlan`] into standalone SVG markup: stacked status bars on the
//! left axis, the score overlay on a fixed 0–100 right axis, legends and
//! optional bar labels. The same markup feeds the on-screen preview and both
//! PNG rasterizers, so what you see is what gets exported.

use crate::chart::fonts::{self, FontWeight, FONT_FAMILY};
use crate::core::config::ChartConfig;
use crate::core::derive::LabelPlacement;
use crate::core::format::format_tick;
use crate::core::plan::{Axis, LegendEntry, LegendLayout, RenderPlan, Swatch};

const TITLE_SIZE: f64 = 22.0;
const AXIS_LABEL_SIZE: f64 = 15.0;
const TICK_SIZE: f64 = 13.0;
const LEGEND_SIZE: f64 = 13.0;
const BAR_LABEL_SIZE: f64 = 12.0;

const OUTER_PAD: f64 = 20.0;
const BAR_WIDTH_RATIO: f64 = 0.8;
/// Share of the canvas height the rotated category labels may take.
const MAX_CATEGORY_SHARE: f64 = 0.3;

const GRID: &str = "#e5e7eb";
const AXIS: &str = "#374151";
const TEXT: &str = "#111827";

/// Resolved pixel geometry of the plotting area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn y_for(&self, axis: &Axis, value: f64) -> f64 {
        self.bottom - value / axis.max * self.height()
    }
}

/// Layout decisions that depend on text extents, computed before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub plot: PlotArea,
    /// Vertical room reserved under the plot for rotated category labels.
    pub category_space: f64,
    /// Height of the unified legend block (zero for separate legends).
    pub legend_band: f64,
}

pub fn layout(plan: &RenderPlan, config: &ChartConfig) -> Layout {
    let width = f64::from(config.width);
    let height = f64::from(config.height);

    let title = fonts::measure(FontWeight::Bold, TITLE_SIZE);
    let caption = fonts::measure(FontWeight::Regular, AXIS_LABEL_SIZE);

    let left_ticks = widest_tick(&plan.left_axis);
    let right_ticks = widest_tick(&plan.right_axis);

    let widest_category = plan
        .categories
        .iter()
        .map(|label| fonts::text_width(FontWeight::Regular, TICK_SIZE, label))
        .fold(0.0, f64::max);
    let category_space = (widest_category + 14.0).min(height * MAX_CATEGORY_SHARE);

    let legend_band = match &plan.legend {
        LegendLayout::Unified { entries, columns } => {
            let rows = entries.len().div_ceil((*columns).max(1));
            legend_box_height(rows) + 12.0
        }
        LegendLayout::Separate { .. } => 0.0,
    };

    let plot = PlotArea {
        left: OUTER_PAD + caption.line_h + 8.0 + left_ticks + 10.0,
        top: OUTER_PAD + title.line_h + 16.0,
        right: width - (OUTER_PAD + caption.line_h + 8.0 + right_ticks + 10.0),
        bottom: height - (OUTER_PAD + category_space + legend_band),
    };

    Layout {
        plot,
        category_space,
        legend_band,
    }
}

fn widest_tick(axis: &Axis) -> f64 {
    axis.ticks
        .iter()
        .map(|tick| fonts::text_width(FontWeight::Regular, TICK_SIZE, &format_tick(*tick)))
        .fold(0.0, f64::max)
}

fn legend_row_height() -> f64 {
    fonts::measure(FontWeight::Regular, LEGEND_SIZE).line_h + 6.0
}

fn legend_box_height(rows: usize) -> f64 {
    rows as f64 * legend_row_height() + 12.0
}

pub fn render_svg(plan: &RenderPlan, config: &ChartConfig) -> String {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let Layout {
        plot,
        category_space,
        ..
    } = layout(plan, config);

    let mut out = String::with_capacity(16 * 1024);
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{family}">"#,
        w = config.width,
        h = config.height,
        family = FONT_FAMILY,
    ));
    out.push_str(&format!(
        r#"<defs><clipPath id="plot-area"><rect x="{x:.1}" y="{y:.1}" width="{pw:.1}" height="{ph:.1}"/></clipPath></defs>"#,
        x = plot.left,
        y = plot.top,
        pw = plot.width(),
        ph = plot.height(),
    ));
    out.push_str(&format!(
        r##"<rect width="{width}" height="{height}" fill="#ffffff"/>"##
    ));

    draw_title(&mut out, &plan.title, width);
    draw_grid_and_axes(&mut out, plan, &plot, width);
    draw_bars(&mut out, plan, &plot);
    draw_bar_labels(&mut out, plan, &plot);
    draw_score(&mut out, plan, &plot);
    draw_categories(&mut out, plan, &plot, category_space);
    draw_legends(&mut out, plan, &plot, category_space, width);

    out.push_str("</svg>");
    out
}

fn draw_title(out: &mut String, title: &str, width: f64) {
    let metrics = fonts::measure(FontWeight::Bold, TITLE_SIZE);
    out.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="{TITLE_SIZE}" font-weight="{weight}" fill="{TEXT}">{title}</text>"#,
        x = width / 2.0,
        y = OUTER_PAD + metrics.asc,
        weight = FontWeight::Bold.css(),
        title = escape_xml(title),
    ));
}

fn draw_grid_and_axes(out: &mut String, plan: &RenderPlan, plot: &PlotArea, width: f64) {
    let tick_metrics = fonts::measure(FontWeight::Regular, TICK_SIZE);
    let caption = fonts::measure(FontWeight::Regular, AXIS_LABEL_SIZE);
    let baseline_shift = tick_metrics.asc / 2.0 - 1.0;

    for tick in &plan.left_axis.ticks {
        let y = plot.y_for(&plan.left_axis, *tick);
        out.push_str(&format!(
            r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{GRID}" stroke-width="1"/>"#,
            x1 = plot.left,
            x2 = plot.right,
        ));
        out.push_str(&format!(
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="end" font-size="{TICK_SIZE}" fill="{TEXT}">{label}</text>"#,
            x = plot.left - 8.0,
            ty = y + baseline_shift,
            label = format_tick(*tick),
        ));
    }

    for tick in &plan.right_axis.ticks {
        let y = plot.y_for(&plan.right_axis, *tick);
        out.push_str(&format!(
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="start" font-size="{TICK_SIZE}" fill="{TEXT}">{label}</text>"#,
            x = plot.right + 8.0,
            ty = y + baseline_shift,
            label = format_tick(*tick),
        ));
    }

    out.push_str(&format!(
        r#"<path d="M{l:.1},{t:.1} V{b:.1} H{r:.1} V{t:.1}" fill="none" stroke="{AXIS}" stroke-width="1.2"/>"#,
        l = plot.left,
        t = plot.top,
        b = plot.bottom,
        r = plot.right,
    ));

    let mid_y = plot.top + plot.height() / 2.0;
    let left_x = OUTER_PAD + caption.asc;
    let right_x = width - OUTER_PAD - caption.asc;
    out.push_str(&format!(
        r#"<text transform="translate({left_x:.1},{mid_y:.1}) rotate(-90)" text-anchor="middle" font-size="{AXIS_LABEL_SIZE}" fill="{TEXT}">{label}</text>"#,
        label = escape_xml(&plan.left_axis.label),
    ));
    out.push_str(&format!(
        r#"<text transform="translate({right_x:.1},{mid_y:.1}) rotate(90)" text-anchor="middle" font-size="{AXIS_LABEL_SIZE}" fill="{TEXT}">{label}</text>"#,
        label = escape_xml(&plan.right_axis.label),
    ));
}

fn slot_width(plan: &RenderPlan, plot: &PlotArea) -> f64 {
    plot.width() / plan.categories.len().max(1) as f64
}

fn category_center(plan: &RenderPlan, plot: &PlotArea, index: usize) -> f64 {
    let slot = slot_width(plan, plot);
    plot.left + slot * (index as f64 + 0.5)
}

fn draw_bars(out: &mut String, plan: &RenderPlan, plot: &PlotArea) {
    let bar_width = slot_width(plan, plot) * BAR_WIDTH_RATIO;
    out.push_str(r#"<g class="bars">"#);
    for series in &plan.bars {
        let fill = series.color.hex();
        for (idx, (height, bottom)) in series.heights.iter().zip(&series.bottoms).enumerate() {
            if *height <= 0.0 {
                continue;
            }
            let x = category_center(plan, plot, idx) - bar_width / 2.0;
            let y_top = plot.y_for(&plan.left_axis, bottom + height);
            let y_base = plot.y_for(&plan.left_axis, *bottom);
            out.push_str(&format!(
                r#"<rect x="{x:.1}" y="{y_top:.1}" width="{bar_width:.1}" height="{h:.1}" fill="{fill}"/>"#,
                h = y_base - y_top,
            ));
        }
    }
    out.push_str("</g>");
}

fn draw_bar_labels(out: &mut String, plan: &RenderPlan, plot: &PlotArea) {
    if plan.bar_labels.is_empty() {
        return;
    }
    let metrics = fonts::measure(FontWeight::Bold, BAR_LABEL_SIZE);
    out.push_str(r#"<g class="bar-labels">"#);
    for label in &plan.bar_labels {
        let x = category_center(plan, plot, label.category);
        let anchor_y = plot.y_for(&plan.left_axis, label.y);
        let y = match label.placement {
            LabelPlacement::AboveStack => anchor_y - 5.0,
            LabelPlacement::SegmentMiddle => anchor_y + metrics.asc / 2.0 - 1.0,
        };
        out.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="{BAR_LABEL_SIZE}" font-weight="{weight}" fill="{fill}">{text}</text>"#,
            weight = FontWeight::Bold.css(),
            fill = label.tone.color().hex(),
            text = escape_xml(&label.text),
        ));
    }
    out.push_str("</g>");
}

fn draw_score(out: &mut String, plan: &RenderPlan, plot: &PlotArea) {
    let points: Vec<(f64, f64)> = plan
        .score
        .values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            (
                category_center(plan, plot, idx),
                plot.y_for(&plan.right_axis, *value),
            )
        })
        .collect();

    out.push_str(r#"<g class="score" clip-path="url(#plot-area)">"#);
    if plan.score.connected && points.len() > 1 {
        let path = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            r#"<polyline points="{path}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
            stroke = plan.score.line_color.hex(),
        ));
    }

    let radius = if plan.score.connected { 4.5 } else { 7.0 };
    for ((x, y), color) in points.iter().zip(&plan.score.markers) {
        out.push_str(&format!(
            r##"<circle cx="{x:.1}" cy="{y:.1}" r="{radius}" fill="{fill}" stroke="#1f2937" stroke-width="0.8"/>"##,
            fill = color.hex(),
        ));
    }
    out.push_str("</g>");
}

fn draw_categories(out: &mut String, plan: &RenderPlan, plot: &PlotArea, space: f64) {
    let max_width = (space - 14.0).max(TICK_SIZE);
    let shift = fonts::measure(FontWeight::Regular, TICK_SIZE).asc / 2.0 - 1.0;
    for (idx, label) in plan.categories.iter().enumerate() {
        let x = category_center(plan, plot, idx) + shift;
        let y = plot.bottom + 8.0;
        out.push_str(&format!(
            r#"<text transform="translate({x:.1},{y:.1}) rotate(-90)" text-anchor="end" font-size="{TICK_SIZE}" fill="{TEXT}">{text}</text>"#,
            text = escape_xml(&fit_label(label, max_width)),
        ));
    }
}

/// Shorten `label` with an ellipsis until it fits `max_width` at tick size.
fn fit_label(label: &str, max_width: f64) -> String {
    if fonts::text_width(FontWeight::Regular, TICK_SIZE, label) <= max_width {
        return label.to_string();
    }
    let mut chars: Vec<char> = label.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "…";
        if fonts::text_width(FontWeight::Regular, TICK_SIZE, &candidate) <= max_width {
            return candidate;
        }
    }
    "…".to_string()
}

fn draw_legends(out: &mut String, plan: &RenderPlan, plot: &PlotArea, category_space: f64, width: f64) {
    match &plan.legend {
        LegendLayout::Separate { bars, score } => {
            let bars_width = legend_box_width(bars, 1);
            draw_legend_box(out, bars, 1, plot.left + 10.0, plot.top + 10.0, bars_width);
            let score_width = legend_box_width(score, 1);
            draw_legend_box(
                out,
                score,
                1,
                plot.right - 10.0 - score_width,
                plot.top + 10.0,
                score_width,
            );
        }
        LegendLayout::Unified { entries, columns } => {
            let columns = (*columns).max(1);
            let box_width = legend_box_width(entries, columns);
            let x = (width - box_width) / 2.0;
            let y = plot.bottom + category_space + 12.0;
            draw_legend_box(out, entries, columns, x, y, box_width);
        }
    }
}

const SWATCH_WIDTH: f64 = 22.0;
const SWATCH_GAP: f64 = 8.0;
const COLUMN_GAP: f64 = 18.0;

fn legend_column_width(entries: &[LegendEntry]) -> f64 {
    let widest = entries
        .iter()
        .map(|entry| fonts::text_width(FontWeight::Regular, LEGEND_SIZE, &entry.label))
        .fold(0.0, f64::max);
    SWATCH_WIDTH + SWATCH_GAP + widest
}

fn legend_box_width(entries: &[LegendEntry], columns: usize) -> f64 {
    let columns = columns.min(entries.len()).max(1);
    let column = legend_column_width(entries);
    columns as f64 * column + (columns as f64 - 1.0) * COLUMN_GAP + 24.0
}

fn draw_legend_box(
    out: &mut String,
    entries: &[LegendEntry],
    columns: usize,
    x: f64,
    y: f64,
    box_width: f64,
) {
    if entries.is_empty() {
        return;
    }
    let rows = entries.len().div_ceil(columns);
    let row_h = legend_row_height();
    let column_w = legend_column_width(entries) + COLUMN_GAP;
    let text_shift = fonts::measure(FontWeight::Regular, LEGEND_SIZE).asc / 2.0 - 1.0;

    out.push_str(&format!(
        r##"<g class="legend"><rect x="{x:.1}" y="{y:.1}" width="{box_width:.1}" height="{h:.1}" rx="4" fill="#ffffff" fill-opacity="0.9" stroke="#d1d5db"/>"##,
        h = legend_box_height(rows),
    ));

    for (idx, entry) in entries.iter().enumerate() {
        let col = idx % columns;
        let row = idx / columns;
        let sx = x + 12.0 + col as f64 * column_w;
        let cy = y + 6.0 + row_h * (row as f64 + 0.5);
        draw_swatch(out, entry.swatch, sx, cy);
        out.push_str(&format!(
            r#"<text x="{tx:.1}" y="{ty:.1}" font-size="{LEGEND_SIZE}" fill="{TEXT}">{label}</text>"#,
            tx = sx + SWATCH_WIDTH + SWATCH_GAP,
            ty = cy + text_shift,
            label = escape_xml(&entry.label),
        ));
    }
    out.push_str("</g>");
}

fn draw_swatch(out: &mut String, swatch: Swatch, x: f64, cy: f64) {
    match swatch {
        Swatch::Bar(color) => out.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{SWATCH_WIDTH}" height="11" fill="{fill}"/>"#,
            y = cy - 5.5,
            fill = color.hex(),
        )),
        Swatch::Line(color) => {
            let stroke = color.hex();
            out.push_str(&format!(
                r#"<line x1="{x:.1}" y1="{cy:.1}" x2="{x2:.1}" y2="{cy:.1}" stroke="{stroke}" stroke-width="2"/>"#,
                x2 = x + SWATCH_WIDTH,
            ));
            out.push_str(&format!(
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="4" fill="{stroke}"/>"#,
                cx = x + SWATCH_WIDTH / 2.0,
            ));
        }
        Swatch::Dot(color) => out.push_str(&format!(
            r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="6" fill="{fill}" stroke="#1f2937" stroke-width="0.8"/>"##,
            cx = x + SWATCH_WIDTH / 2.0,
            fill = color.hex(),
        )),
    }
}

/// Escapes markup and swaps characters XML 1.0 cannot carry for a space.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            '\u{fffe}' | '\u{ffff}' => out.push(' '),
            ch if u32::from(ch) < 0x20 => out.push(' '),
            ch => out.push(ch),
        }
    }
    out
}
