//! Render plan: the fully resolved, renderer-agnostic description of one chart.
//!
//! Every toggle on the form lands here as an enum and is consumed by this one
//! builder, so there is a single rendering path for all combinations.

use serde::{Deserialize, Serialize};

use super::config::{DEFAULT_TITLE, FALLBACK_TITLE};
use super::derive::{
    bar_labels, derive_rows, BarLabel, BarMode, DerivedRow, LabelMode, Rgb, ScoreBucket,
    StatusSegment,
};
use super::error::ChartError;
use super::table::KpiTable;

pub const SCORE_SERIES_NAME: &str = "Average Score (%)";

/// Most legend entries laid side by side in the unified legend before wrapping.
const UNIFIED_LEGEND_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendMode {
    #[default]
    Separate,
    Unified,
}

impl LegendMode {
    pub const ALL: [LegendMode; 2] = [LegendMode::Separate, LegendMode::Unified];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreDisplay {
    #[default]
    Line,
    BucketedDots,
}

impl ScoreDisplay {
    pub const ALL: [ScoreDisplay; 2] = [ScoreDisplay::Line, ScoreDisplay::BucketedDots];
}

/// Everything the form selects besides the pasted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub title: String,
    pub legend: LegendMode,
    pub score_display: ScoreDisplay,
    pub bar_mode: BarMode,
    pub labels: LabelMode,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            legend: LegendMode::default(),
            score_display: ScoreDisplay::default(),
            bar_mode: BarMode::default(),
            labels: LabelMode::default(),
        }
    }
}

/// Blank titles fall back to a fixed caption.
pub fn resolve_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub segment: StatusSegment,
    pub color: Rgb,
    pub heights: Vec<f64>,
    pub bottoms: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSeries {
    pub name: String,
    pub values: Vec<f64>,
    /// One marker colour per category.
    pub markers: Vec<Rgb>,
    /// Draw a connecting line through the markers.
    pub connected: bool,
    pub line_color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub max: f64,
    pub ticks: Vec<f64>,
}

impl Axis {
    fn percent(label: &str) -> Self {
        Self {
            label: label.to_string(),
            max: 100.0,
            ticks: (0..=5).map(|step| f64::from(step) * 20.0).collect(),
        }
    }

    /// Zero-based count axis whose top is a round number at or above `peak`.
    fn counts(label: &str, peak: f64) -> Self {
        let peak = if peak > 0.0 { peak } else { 1.0 };
        let step = nice_step(peak / 5.0).max(1.0);
        let max = (peak / step).ceil() * step;
        let ticks = (0..=(max / step).round() as u32)
            .map(|idx| f64::from(idx) * step)
            .collect();
        Self {
            label: label.to_string(),
            max,
            ticks,
        }
    }
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `raw`.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Swatch {
    Bar(Rgb),
    Line(Rgb),
    Dot(Rgb),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: Swatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LegendLayout {
    /// Bar legend in the upper left of the plot, score legend in the upper right.
    Separate {
        bars: Vec<LegendEntry>,
        score: Vec<LegendEntry>,
    },
    /// One combined box below the plot area.
    Unified {
        entries: Vec<LegendEntry>,
        columns: usize,
    },
}

impl LegendLayout {
    pub fn compose(mode: LegendMode, score_display: ScoreDisplay) -> Self {
        let bars = StatusSegment::STACK
            .iter()
            .map(|segment| LegendEntry {
                label: segment.name().to_string(),
                swatch: Swatch::Bar(segment.color()),
            })
            .collect::<Vec<_>>();

        let score = match score_display {
            ScoreDisplay::Line => vec![LegendEntry {
                label: SCORE_SERIES_NAME.to_string(),
                swatch: Swatch::Line(Rgb::BLACK),
            }],
            ScoreDisplay::BucketedDots => ScoreBucket::ALL
                .iter()
                .map(|bucket| LegendEntry {
                    label: bucket.legend_label().to_string(),
                    swatch: Swatch::Dot(bucket.color()),
                })
                .collect(),
        };

        match mode {
            LegendMode::Separate => LegendLayout::Separate { bars, score },
            LegendMode::Unified => {
                let entries: Vec<_> = bars.into_iter().chain(score).collect();
                let columns = entries.len().min(UNIFIED_LEGEND_COLUMNS);
                LegendLayout::Unified { entries, columns }
            }
        }
    }

    #[cfg(test)]
    fn entries(&self) -> Vec<&LegendEntry> {
        match self {
            LegendLayout::Separate { bars, score } => bars.iter().chain(score.iter()).collect(),
            LegendLayout::Unified { entries, .. } => entries.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub title: String,
    pub bar_mode: BarMode,
    pub score_display: ScoreDisplay,
    pub legend_mode: LegendMode,
    pub label_mode: LabelMode,
    pub categories: Vec<String>,
    pub bars: Vec<BarSeries>,
    pub score: ScoreSeries,
    pub left_axis: Axis,
    pub right_axis: Axis,
    pub legend: LegendLayout,
    pub bar_labels: Vec<BarLabel>,
    /// Categories with no projects; their percent bars are drawn empty.
    pub zero_total: Vec<String>,
    pub rows: Vec<DerivedRow>,
}

impl RenderPlan {
    pub fn build(table: &KpiTable, options: &ChartOptions) -> Result<Self, ChartError> {
        if table.is_empty() {
            return Err(ChartError::EmptyTable);
        }

        let rows = derive_rows(table, options.bar_mode);

        let bars = StatusSegment::STACK
            .iter()
            .enumerate()
            .map(|(idx, segment)| BarSeries {
                segment: *segment,
                color: segment.color(),
                heights: rows.iter().map(|row| row.displayed[idx]).collect(),
                bottoms: rows.iter().map(|row| row.bottoms()[idx]).collect(),
            })
            .collect();

        let score = ScoreSeries {
            name: SCORE_SERIES_NAME.to_string(),
            values: rows.iter().map(|row| row.average_score).collect(),
            markers: rows
                .iter()
                .map(|row| match options.score_display {
                    ScoreDisplay::Line => Rgb::BLACK,
                    ScoreDisplay::BucketedDots => row.bucket.color(),
                })
                .collect(),
            connected: options.score_display == ScoreDisplay::Line,
            line_color: Rgb::BLACK,
        };

        let left_axis = match options.bar_mode {
            BarMode::Raw => {
                let peak = rows.iter().map(DerivedRow::stack_height).fold(0.0, f64::max);
                let headroom = if options.labels == LabelMode::TotalOnly {
                    1.08
                } else {
                    1.0
                };
                Axis::counts(options.bar_mode.axis_label(), peak * headroom)
            }
            BarMode::Percent => Axis::percent(options.bar_mode.axis_label()),
        };

        let zero_total = match options.bar_mode {
            BarMode::Percent => rows
                .iter()
                .filter(|row| row.zero_total)
                .map(|row| row.label.clone())
                .collect(),
            BarMode::Raw => Vec::new(),
        };

        Ok(Self {
            title: resolve_title(&options.title),
            bar_mode: options.bar_mode,
            score_display: options.score_display,
            legend_mode: options.legend,
            label_mode: options.labels,
            categories: rows.iter().map(|row| row.label.clone()).collect(),
            bars,
            score,
            left_axis,
            right_axis: Axis::percent(SCORE_SERIES_NAME),
            legend: LegendLayout::compose(options.legend, options.score_display),
            bar_labels: bar_labels(&rows, options.labels, options.bar_mode),
            zero_total,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::KpiRow;

    fn table() -> KpiTable {
        KpiTable::from_rows(vec![
            KpiRow {
                label: "A".into(),
                average_score: 50.0,
                green: 3,
                amber: 1,
                red: 1,
            },
            KpiRow {
                label: "B".into(),
                average_score: 90.0,
                green: 5,
                amber: 0,
                red: 0,
            },
        ])
    }

    #[test]
    fn blank_title_falls_back() {
        assert_eq!(resolve_title("   "), "KPI Chart");
        assert_eq!(resolve_title("  Ops  "), "Ops");
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = RenderPlan::build(&KpiTable::default(), &ChartOptions::default()).unwrap_err();
        assert_eq!(err, ChartError::EmptyTable);
    }

    #[test]
    fn bars_are_stacked_in_status_order() {
        let plan = RenderPlan::build(&table(), &ChartOptions::default()).unwrap();
        assert_eq!(plan.categories, vec!["A", "B"]);
        assert_eq!(plan.bars.len(), 3);
        assert_eq!(plan.bars[0].segment, StatusSegment::Green);
        assert_eq!(plan.bars[2].bottoms, vec![4.0, 5.0]);
        assert_eq!(plan.left_axis.label, "Count of Status");
        assert!(plan.left_axis.max >= 5.0);
        assert_eq!(plan.right_axis.max, 100.0);
    }

    #[test]
    fn percent_mode_fixes_left_axis() {
        let options = ChartOptions {
            bar_mode: BarMode::Percent,
            ..ChartOptions::default()
        };
        let plan = RenderPlan::build(&table(), &options).unwrap();
        assert_eq!(plan.left_axis.max, 100.0);
        assert_eq!(plan.bars[0].heights, vec![60.0, 100.0]);
    }

    #[test]
    fn separate_legend_with_dots_lists_buckets() {
        let layout = LegendLayout::compose(LegendMode::Separate, ScoreDisplay::BucketedDots);
        match layout {
            LegendLayout::Separate { bars, score } => {
                assert_eq!(bars.len(), 3);
                assert_eq!(score.len(), 3);
                assert_eq!(score[1].swatch, Swatch::Dot(Rgb::AMBER));
            }
            other => panic!("unexpected layout {other:?}"),
        }
    }

    #[test]
    fn unified_legend_concatenates_bars_then_score() {
        let layout = LegendLayout::compose(LegendMode::Unified, ScoreDisplay::Line);
        let labels: Vec<_> = layout.entries().iter().map(|e| e.label.clone()).collect();
        assert_eq!(labels, vec!["Green", "Amber", "Red", "Average Score (%)"]);
        assert!(matches!(layout, LegendLayout::Unified { columns: 4, .. }));
    }

    #[test]
    fn dots_take_bucket_colours() {
        let options = ChartOptions {
            score_display: ScoreDisplay::BucketedDots,
            ..ChartOptions::default()
        };
        let plan = RenderPlan::build(&table(), &options).unwrap();
        assert_eq!(plan.score.markers, vec![Rgb::RED, Rgb::GREEN]);
        assert!(!plan.score.connected);
    }

    #[test]
    fn zero_total_rows_are_listed_in_percent_mode() {
        let mut rows = table().rows().to_vec();
        rows.push(KpiRow {
            label: "Idle".into(),
            average_score: 70.0,
            green: 0,
            amber: 0,
            red: 0,
        });
        let options = ChartOptions {
            bar_mode: BarMode::Percent,
            ..ChartOptions::default()
        };
        let plan = RenderPlan::build(&KpiTable::from_rows(rows), &options).unwrap();
        assert_eq!(plan.zero_total, vec!["Idle"]);
    }

    #[test]
    fn count_axis_uses_round_steps() {
        let axis = Axis::counts("Count", 23.0);
        assert_eq!(axis.max, 25.0);
        assert_eq!(axis.ticks, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0]);

        let tiny = Axis::counts("Count", 0.0);
        assert_eq!(tiny.max, 1.0);
        assert_eq!(tiny.ticks, vec![0.0, 1.0]);
    }
}
