//! End-to-end Generate scenarios through the public API.

use ui::chart::export::build_csv;
use ui::chart::svg::render_svg;
use ui::core::derive::{BarMode, LabelMode, ScoreBucket};
use ui::core::error::Column;
use ui::core::plan::{ChartOptions, LegendLayout, LegendMode, ScoreDisplay};
use ui::core::{generate, ChartConfig, ChartError, KpiInput};

fn two_rows() -> KpiInput {
    KpiInput {
        labels: "A\nB".into(),
        scores: "50\n90".into(),
        green: "3\n5".into(),
        amber: "1\n0".into(),
        red: "1\n0".into(),
    }
}

fn options(bar_mode: BarMode) -> ChartOptions {
    ChartOptions {
        bar_mode,
        ..ChartOptions::default()
    }
}

#[test]
fn raw_counts_scenario() {
    let plan = generate(&two_rows(), &options(BarMode::Raw), &ChartConfig::default()).unwrap();

    assert_eq!(plan.categories, vec!["A", "B"]);
    let totals: Vec<u64> = plan.rows.iter().map(|row| row.total).collect();
    assert_eq!(totals, vec![5, 5]);
    assert_eq!(plan.rows[0].bucket, ScoreBucket::Low);
    assert_eq!(plan.rows[1].bucket, ScoreBucket::High);

    assert_eq!(plan.bars[0].heights, vec![3.0, 5.0]);
    assert_eq!(plan.bars[1].bottoms, vec![3.0, 5.0]);
    assert_eq!(plan.bars[2].bottoms, vec![4.0, 5.0]);
    assert_eq!(plan.left_axis.label, "Count of Status");
    assert!(plan.left_axis.max >= 5.0);
    assert_eq!(plan.right_axis.max, 100.0);
}

#[test]
fn percent_scenario() {
    let plan = generate(&two_rows(), &options(BarMode::Percent), &ChartConfig::default()).unwrap();

    let a: Vec<f64> = plan.bars.iter().map(|series| series.heights[0]).collect();
    let b: Vec<f64> = plan.bars.iter().map(|series| series.heights[1]).collect();
    assert_eq!(a, vec![60.0, 20.0, 20.0]);
    assert_eq!(b, vec![100.0, 0.0, 0.0]);
    assert_eq!(plan.left_axis.label, "Share of Projects (%)");
    assert_eq!(plan.left_axis.max, 100.0);
    assert!(plan.zero_total.is_empty());
}

#[test]
fn mismatched_columns_produce_no_plan() {
    let mut input = two_rows();
    input.labels = "A\nB\nC".into();

    let err = generate(&input, &ChartOptions::default(), &ChartConfig::default()).unwrap_err();
    assert!(matches!(err, ChartError::LengthMismatch { .. }));
    assert!(err
        .to_string()
        .starts_with("All columns must have the same number of entries"));
}

#[test]
fn score_tokens_accept_percent_and_reject_words() {
    let mut input = two_rows();
    input.scores = "85%\n90".into();
    let plan = generate(&input, &ChartOptions::default(), &ChartConfig::default()).unwrap();
    assert_eq!(plan.score.values[0], 85.0);

    input.scores = "abc\n90".into();
    let err = generate(&input, &ChartOptions::default(), &ChartConfig::default()).unwrap_err();
    match err {
        ChartError::Parse { column, entry, token, .. } => {
            assert_eq!(column, Column::Score);
            assert_eq!(entry, 1);
            assert_eq!(token, "abc");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn zero_total_rows_are_flagged_in_percent_mode() {
    let mut input = two_rows();
    input.green = "3\n0".into();
    let plan = generate(&input, &options(BarMode::Percent), &ChartConfig::default()).unwrap();

    assert_eq!(plan.zero_total, vec!["B"]);
    assert!(plan.bars.iter().all(|series| series.heights[1] == 0.0));
}

#[test]
fn every_toggle_combination_renders() {
    let config = ChartConfig::default();
    for legend in LegendMode::ALL {
        for score_display in ScoreDisplay::ALL {
            for bar_mode in BarMode::ALL {
                for labels in LabelMode::ALL {
                    let options = ChartOptions {
                        title: "  ".into(),
                        legend,
                        score_display,
                        bar_mode,
                        labels,
                    };
                    let plan = generate(&two_rows(), &options, &config).unwrap();
                    assert_eq!(plan.title, "KPI Chart");
                    assert_eq!(plan.score.connected, score_display == ScoreDisplay::Line);
                    assert_eq!(
                        matches!(plan.legend, LegendLayout::Unified { .. }),
                        legend == LegendMode::Unified
                    );

                    let svg = render_svg(&plan, &config);
                    assert!(svg.starts_with("<svg"));
                    assert!(svg.ends_with("</svg>"));
                }
            }
        }
    }
}

#[test]
fn csv_export_lists_derived_rows() {
    let plan = generate(&two_rows(), &options(BarMode::Percent), &ChartConfig::default()).unwrap();
    let csv = build_csv(&plan.rows);
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "A,50,3,1,1,5,60.00,20.00,20.00,Low");
    assert_eq!(lines[2], "B,90,5,0,0,5,100.00,0.00,0.00,High");
}
