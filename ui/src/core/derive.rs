//! Derived per-row metrics: totals, status shares, score buckets and bar labels.

use serde::{Deserialize, Serialize};

use super::table::{KpiRow, KpiTable};

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const AMBER: Rgb = Rgb(255, 165, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarMode {
    #[default]
    Raw,
    Percent,
}

impl BarMode {
    pub const ALL: [BarMode; 2] = [BarMode::Raw, BarMode::Percent];

    pub fn axis_label(self) -> &'static str {
        match self {
            BarMode::Raw => "Count of Status",
            BarMode::Percent => "Share of Projects (%)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelMode {
    #[default]
    None,
    TotalOnly,
    AllSegments,
}

impl LabelMode {
    pub const ALL: [LabelMode; 3] = [LabelMode::None, LabelMode::TotalOnly, LabelMode::AllSegments];
}

/// The three stacked segments, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusSegment {
    Green,
    Amber,
    Red,
}

impl StatusSegment {
    pub const STACK: [StatusSegment; 3] =
        [StatusSegment::Green, StatusSegment::Amber, StatusSegment::Red];

    pub fn name(self) -> &'static str {
        match self {
            StatusSegment::Green => "Green",
            StatusSegment::Amber => "Amber",
            StatusSegment::Red => "Red",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            StatusSegment::Green => Rgb::GREEN,
            StatusSegment::Amber => Rgb::AMBER,
            StatusSegment::Red => Rgb::RED,
        }
    }

    /// Text drawn on top of this segment: white on green and red, black on amber.
    pub fn label_tone(self) -> TextTone {
        match self {
            StatusSegment::Amber => TextTone::Dark,
            StatusSegment::Green | StatusSegment::Red => TextTone::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextTone {
    Light,
    Dark,
}

impl TextTone {
    pub fn color(self) -> Rgb {
        match self {
            TextTone::Light => Rgb::WHITE,
            TextTone::Dark => Rgb::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBucket {
    Low,
    Medium,
    High,
}

impl ScoreBucket {
    pub const ALL: [ScoreBucket; 3] = [ScoreBucket::Low, ScoreBucket::Medium, ScoreBucket::High];

    /// Lower bounds are inclusive: 60.0 is Medium, 80.0 is High.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBucket::High
        } else if score >= 60.0 {
            ScoreBucket::Medium
        } else {
            ScoreBucket::Low
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            ScoreBucket::Low => Rgb::RED,
            ScoreBucket::Medium => Rgb::AMBER,
            ScoreBucket::High => Rgb::GREEN,
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            ScoreBucket::Low => "Score < 60%",
            ScoreBucket::Medium => "Score 60–79%",
            ScoreBucket::High => "Score ≥ 80%",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScoreBucket::Low => "Low",
            ScoreBucket::Medium => "Medium",
            ScoreBucket::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub label: String,
    pub average_score: f64,
    /// Green, amber, red counts.
    pub counts: [u64; 3],
    pub total: u64,
    /// Green, amber, red shares of `total` in percent; all zero when `total` is zero.
    pub percentages: [f64; 3],
    /// Segment heights in left-axis units for the selected bar mode.
    pub displayed: [f64; 3],
    pub bucket: ScoreBucket,
    /// Set when the row has no projects at all, so its percentages are a placeholder.
    pub zero_total: bool,
}

impl DerivedRow {
    pub fn from_row(row: &KpiRow, mode: BarMode) -> Self {
        let counts = row.counts();
        let total = row.total();
        let percentages = shares(counts, total);
        let displayed = match mode {
            BarMode::Raw => counts.map(|count| count as f64),
            BarMode::Percent => percentages,
        };

        Self {
            label: row.label.clone(),
            average_score: row.average_score,
            counts,
            total,
            percentages,
            displayed,
            bucket: ScoreBucket::from_score(row.average_score),
            zero_total: total == 0,
        }
    }

    /// Height of the full stack in left-axis units.
    pub fn stack_height(&self) -> f64 {
        self.displayed.iter().sum()
    }

    /// Baseline of each segment (green sits on zero).
    pub fn bottoms(&self) -> [f64; 3] {
        [
            0.0,
            self.displayed[0],
            self.displayed[0] + self.displayed[1],
        ]
    }
}

pub fn derive_rows(table: &KpiTable, mode: BarMode) -> Vec<DerivedRow> {
    table
        .rows()
        .iter()
        .map(|row| DerivedRow::from_row(row, mode))
        .collect()
}

fn shares(counts: [u64; 3], total: u64) -> [f64; 3] {
    if total == 0 {
        return [0.0; 3];
    }
    let total = total as f64;
    counts.map(|count| count as f64 / total * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPlacement {
    /// Just above the top of the stack.
    AboveStack,
    /// Vertically centred inside a segment.
    SegmentMiddle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLabel {
    pub category: usize,
    pub text: String,
    /// Anchor height in left-axis units.
    pub y: f64,
    pub placement: LabelPlacement,
    pub tone: TextTone,
}

pub fn bar_labels(rows: &[DerivedRow], labels: LabelMode, bar_mode: BarMode) -> Vec<BarLabel> {
    match labels {
        LabelMode::None => Vec::new(),
        LabelMode::TotalOnly => rows
            .iter()
            .enumerate()
            .map(|(category, row)| BarLabel {
                category,
                text: row.total.to_string(),
                y: row.stack_height(),
                placement: LabelPlacement::AboveStack,
                tone: TextTone::Dark,
            })
            .collect(),
        LabelMode::AllSegments => {
            let mut out = Vec::new();
            for (category, row) in rows.iter().enumerate() {
                let bottoms = row.bottoms();
                for (idx, segment) in StatusSegment::STACK.into_iter().enumerate() {
                    if row.counts[idx] == 0 {
                        continue;
                    }
                    let text = match bar_mode {
                        BarMode::Raw => row.counts[idx].to_string(),
                        BarMode::Percent => format!("{}%", row.percentages[idx].round() as i64),
                    };
                    out.push(BarLabel {
                        category,
                        text,
                        y: bottoms[idx] + row.displayed[idx] / 2.0,
                        placement: LabelPlacement::SegmentMiddle,
                        tone: segment.label_tone(),
                    });
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, score: f64, green: u64, amber: u64, red: u64) -> KpiRow {
        KpiRow {
            label: label.into(),
            average_score: score,
            green,
            amber,
            red,
        }
    }

    fn sample() -> KpiTable {
        KpiTable::from_rows(vec![row("A", 50.0, 3, 1, 1), row("B", 90.0, 5, 0, 0)])
    }

    #[test]
    fn raw_mode_keeps_counts() {
        let rows = derive_rows(&sample(), BarMode::Raw);
        assert_eq!(rows[0].total, 5);
        assert_eq!(rows[1].total, 5);
        assert_eq!(rows[0].displayed, [3.0, 1.0, 1.0]);
        assert_eq!(rows[0].bucket, ScoreBucket::Low);
        assert_eq!(rows[1].bucket, ScoreBucket::High);
    }

    #[test]
    fn percent_mode_normalises_each_row() {
        let rows = derive_rows(&sample(), BarMode::Percent);
        assert_eq!(rows[0].displayed, [60.0, 20.0, 20.0]);
        assert_eq!(rows[1].displayed, [100.0, 0.0, 0.0]);
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        for counts in [[1, 1, 1], [7, 0, 3], [0, 0, 9], [123, 456, 789], [5_000_000_000, 5_000_000_000, 1]] {
            let derived = DerivedRow::from_row(&row("x", 0.0, counts[0], counts[1], counts[2]), BarMode::Percent);
            let sum: f64 = derived.displayed.iter().sum();
            assert!((sum - 100.0).abs() < 1e-9, "{counts:?} summed to {sum}");
        }
    }

    #[test]
    fn zero_total_renders_as_zero_and_is_flagged() {
        let derived = DerivedRow::from_row(&row("idle", 75.0, 0, 0, 0), BarMode::Percent);
        assert_eq!(derived.displayed, [0.0; 3]);
        assert!(derived.zero_total);
        assert!(derived.displayed.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(ScoreBucket::from_score(59.999), ScoreBucket::Low);
        assert_eq!(ScoreBucket::from_score(60.0), ScoreBucket::Medium);
        assert_eq!(ScoreBucket::from_score(79.99), ScoreBucket::Medium);
        assert_eq!(ScoreBucket::from_score(80.0), ScoreBucket::High);
        assert_eq!(ScoreBucket::from_score(-5.0), ScoreBucket::Low);
        assert_eq!(ScoreBucket::from_score(140.0), ScoreBucket::High);
    }

    #[test]
    fn bottoms_stack_segments() {
        let derived = DerivedRow::from_row(&row("A", 50.0, 3, 1, 1), BarMode::Raw);
        assert_eq!(derived.bottoms(), [0.0, 3.0, 4.0]);
        assert_eq!(derived.stack_height(), 5.0);
    }

    #[test]
    fn total_labels_sit_above_each_stack() {
        let rows = derive_rows(&sample(), BarMode::Raw);
        let labels = bar_labels(&rows, LabelMode::TotalOnly, BarMode::Raw);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "5");
        assert_eq!(labels[0].y, 5.0);
        assert_eq!(labels[0].placement, LabelPlacement::AboveStack);
    }

    #[test]
    fn segment_labels_skip_empty_segments() {
        let rows = derive_rows(&sample(), BarMode::Raw);
        let labels = bar_labels(&rows, LabelMode::AllSegments, BarMode::Raw);
        // Row A has three segments, row B only green.
        assert_eq!(labels.len(), 4);
        let amber = &labels[1];
        assert_eq!(amber.text, "1");
        assert_eq!(amber.y, 3.5);
        assert_eq!(amber.tone, TextTone::Dark);
        assert_eq!(labels[0].tone, TextTone::Light);
        assert_eq!(labels[2].tone, TextTone::Light);
    }

    #[test]
    fn segment_labels_show_percentages_in_percent_mode() {
        let rows = derive_rows(&sample(), BarMode::Percent);
        let labels = bar_labels(&rows, LabelMode::AllSegments, BarMode::Percent);
        let texts: Vec<_> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["60%", "20%", "20%", "100%"]);
        assert_eq!(labels[0].y, 30.0);
    }

    #[test]
    fn no_labels_mode_is_empty() {
        let rows = derive_rows(&sample(), BarMode::Raw);
        assert!(bar_labels(&rows, LabelMode::None, BarMode::Raw).is_empty());
    }
}
