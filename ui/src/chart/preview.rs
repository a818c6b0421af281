use dioxus::prelude::*;

use crate::chart::export::ChartExportPanel;
use crate::chart::svg::render_svg;
use crate::core::config::ChartConfig;
use crate::core::derive::{BarMode, ScoreBucket};
use crate::core::format::{format_percent, format_score};
use crate::core::RenderPlan;
use crate::t;

/// Display strings for one line of the derived-data table.
struct TableRow {
    label: String,
    score: String,
    counts: Vec<String>,
    total: u64,
    bucket: String,
    bucket_color: String,
}

fn bucket_label(bucket: ScoreBucket) -> String {
    match bucket {
        ScoreBucket::Low => t!("bucket-low"),
        ScoreBucket::Medium => t!("bucket-medium"),
        ScoreBucket::High => t!("bucket-high"),
    }
}

#[component]
pub fn ChartPreview(plan: RenderPlan, config: ChartConfig) -> Element {
    let svg = render_svg(&plan, &config);
    let percent = plan.bar_mode == BarMode::Percent;
    let summary = t!(
        "preview-summary",
        rows = plan.rows.len(),
        total = plan.rows.iter().map(|row| row.total).sum::<u64>()
    );
    let zero_total = (!plan.zero_total.is_empty())
        .then(|| t!("preview-zero-total", categories = plan.zero_total.join(", ")));
    let rows: Vec<TableRow> = plan
        .rows
        .iter()
        .map(|row| TableRow {
            label: row.label.clone(),
            score: format_score(row.average_score),
            counts: row
                .counts
                .iter()
                .zip(row.percentages)
                .map(|(count, pct)| {
                    if percent {
                        format!("{count} ({})", format_percent(pct))
                    } else {
                        count.to_string()
                    }
                })
                .collect(),
            total: row.total,
            bucket: bucket_label(row.bucket),
            bucket_color: row.bucket.color().hex(),
        })
        .collect();

    rsx! {
        section { class: "chart-card chart-preview",
            div { class: "chart-card__header",
                h2 { "{plan.title}" }
                span { class: "chart-card__meta", "{summary}" }
            }

            div {
                class: "chart-preview__canvas",
                style: "aspect-ratio: {config.width} / {config.height};",
                dangerous_inner_html: "{svg}",
            }

            if let Some(notice) = zero_total {
                p { class: "chart-card__meta chart-preview__notice", "{notice}" }
            }

            details { class: "chart-preview__data",
                summary { {t!("preview-data-title")} }
                table { class: "chart-table",
                    thead {
                        tr {
                            th { {t!("form-column-labels")} }
                            th { {t!("form-column-scores")} }
                            th { {t!("form-column-green")} }
                            th { {t!("form-column-amber")} }
                            th { {t!("form-column-red")} }
                            th { {t!("preview-column-total")} }
                            th { {t!("preview-column-bucket")} }
                        }
                    }
                    tbody {
                        for row in rows {
                            tr {
                                td { "{row.label}" }
                                td { "{row.score}" }
                                for count in row.counts {
                                    td { "{count}" }
                                }
                                td { "{row.total}" }
                                td {
                                    span {
                                        class: "chart-table__bucket",
                                        style: "background: {row.bucket_color};",
                                    }
                                    "{row.bucket}"
                                }
                            }
                        }
                    }
                }
            }

            ChartExportPanel { plan: plan.clone(), config }
        }
    }
}
