//! Data-entry form: five pasted columns, the chart title and the four toggles.

use dioxus::prelude::*;
use tracing::{error, warn};

use crate::chart::preview::ChartPreview;
use crate::core::config::{ChartConfig, SampleData, DEFAULT_TITLE, TITLE_PRESETS};
use crate::core::derive::{BarMode, LabelMode};
use crate::core::error::{ChartError, Column};
use crate::core::plan::{ChartOptions, LegendMode, ScoreDisplay};
use crate::core::{generate, KpiInput, RenderPlan};
use crate::t;

fn column_label(column: Column) -> String {
    match column {
        Column::Label => t!("form-column-labels"),
        Column::Score => t!("form-column-scores"),
        Column::Green => t!("form-column-green"),
        Column::Amber => t!("form-column-amber"),
        Column::Red => t!("form-column-red"),
    }
}

fn legend_label(mode: LegendMode) -> String {
    match mode {
        LegendMode::Separate => t!("option-legend-separate"),
        LegendMode::Unified => t!("option-legend-unified"),
    }
}

fn score_label(display: ScoreDisplay) -> String {
    match display {
        ScoreDisplay::Line => t!("option-score-line"),
        ScoreDisplay::BucketedDots => t!("option-score-dots"),
    }
}

fn bar_label(mode: BarMode) -> String {
    match mode {
        BarMode::Raw => t!("option-bars-raw"),
        BarMode::Percent => t!("option-bars-percent"),
    }
}

fn labels_label(mode: LabelMode) -> String {
    match mode {
        LabelMode::None => t!("option-labels-none"),
        LabelMode::TotalOnly => t!("option-labels-total"),
        LabelMode::AllSegments => t!("option-labels-all"),
    }
}

/// One radio group bound to a toggle signal.
fn choice_group<T>(name: &'static str, caption: String, choices: Vec<(T, String)>, selected: Signal<T>) -> Element
where
    T: Copy + PartialEq + 'static,
{
    rsx! {
        fieldset { class: "chart-form__choices",
            legend { "{caption}" }
            for (value, text) in choices {
                label { class: "chart-form__choice",
                    input {
                        r#type: "radio",
                        name: name,
                        checked: selected() == value,
                        onchange: move |_| {
                            let mut selected = selected;
                            selected.set(value);
                        },
                    }
                    span { "{text}" }
                }
            }
        }
    }
}

#[component]
pub fn ChartForm() -> Element {
    let config = try_use_context::<ChartConfig>().unwrap_or_default();

    let mut labels = use_signal(String::new);
    let mut scores = use_signal(String::new);
    let mut green = use_signal(String::new);
    let mut amber = use_signal(String::new);
    let mut red = use_signal(String::new);
    let mut title = use_signal(|| DEFAULT_TITLE.to_string());

    let legend = use_signal(LegendMode::default);
    let score_display = use_signal(ScoreDisplay::default);
    let bar_mode = use_signal(BarMode::default);
    let label_mode = use_signal(LabelMode::default);

    let mut outcome = use_signal(|| None::<Result<RenderPlan, ChartError>>);

    let on_generate = move |_| {
        let input = KpiInput {
            labels: labels(),
            scores: scores(),
            green: green(),
            amber: amber(),
            red: red(),
        };
        let options = ChartOptions {
            title: title(),
            legend: legend(),
            score_display: score_display(),
            bar_mode: bar_mode(),
            labels: label_mode(),
        };
        let result = generate(&input, &options, &config);
        match &result {
            Err(err) if err.is_validation() => warn!(%err, "chart input rejected"),
            Err(err) => error!(%err, "chart generation failed"),
            Ok(_) => {}
        }
        outcome.set(Some(result));
    };

    let on_sample = move |_| {
        labels.set(SampleData::LABELS.to_string());
        scores.set(SampleData::SCORES.to_string());
        green.set(SampleData::GREEN.to_string());
        amber.set(SampleData::AMBER.to_string());
        red.set(SampleData::RED.to_string());
    };

    let columns = Column::ALL.into_iter().zip([labels, scores, green, amber, red]);

    rsx! {
        section { class: "chart-card chart-form",
            div { class: "chart-card__header",
                h2 { {t!("form-title")} }
            }
            p { class: "chart-card__meta", {t!("form-hint")} }

            div { class: "chart-form__columns",
                for (column, field) in columns {
                    label { class: "chart-form__column",
                        span { class: "chart-form__column-title", {column_label(column)} }
                        textarea {
                            rows: "10",
                            spellcheck: "false",
                            value: "{field}",
                            oninput: move |evt: FormEvent| {
                                let mut field = field;
                                field.set(evt.value());
                            },
                        }
                    }
                }
            }

            div { class: "chart-form__title",
                label { r#for: "chart-title", {t!("form-chart-title")} }
                input {
                    id: "chart-title",
                    r#type: "text",
                    value: "{title}",
                    oninput: move |evt| title.set(evt.value()),
                }
                select {
                    "aria-label": t!("form-title-presets"),
                    onchange: move |evt| {
                        let preset = evt.value();
                        if !preset.is_empty() {
                            title.set(preset);
                        }
                    },
                    option { value: "", {t!("form-title-presets")} }
                    for preset in TITLE_PRESETS.iter() {
                        option { value: "{preset}", "{preset}" }
                    }
                }
            }

            div { class: "chart-form__toggles",
                {choice_group("legend", t!("form-legend"), LegendMode::ALL.iter().map(|m| (*m, legend_label(*m))).collect(), legend)}
                {choice_group("score", t!("form-score-display"), ScoreDisplay::ALL.iter().map(|m| (*m, score_label(*m))).collect(), score_display)}
                {choice_group("bars", t!("form-bar-mode"), BarMode::ALL.iter().map(|m| (*m, bar_label(*m))).collect(), bar_mode)}
                {choice_group("labels", t!("form-labels"), LabelMode::ALL.iter().map(|m| (*m, labels_label(*m))).collect(), label_mode)}
            }

            div { class: "chart-form__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: on_generate,
                    {t!("form-generate")}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: on_sample,
                    {t!("form-load-sample")}
                }
            }
        }

        {match outcome() {
            Some(Ok(plan)) => rsx! {
                ChartPreview { plan, config }
            },
            Some(Err(err)) => rsx! {
                p { class: "chart-form__error", role: "alert", "⚠️ {err}" }
            },
            None => rsx! {
                p { class: "chart-card__meta chart-form__empty", {t!("form-empty")} }
            },
        }}
    }
}
