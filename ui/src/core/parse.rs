//! Input parsing and validation for the pasted KPI columns.
//!
//! Each column is one entry per line. Blank lines are ignored everywhere, so a
//! stray trailing newline never shifts rows. The result is all-or-nothing: the
//! first malformed token or any length disagreement rejects the whole table.

use tracing::debug;

use super::config::ChartConfig;
use super::error::{ChartError, Column, ColumnCounts};
use super::table::{KpiInput, KpiRow, KpiTable};

pub fn parse_table(input: &KpiInput, config: &ChartConfig) -> Result<KpiTable, ChartError> {
    let labels: Vec<String> = entries(&input.labels).map(str::to_string).collect();
    let scores = parse_column(&input.scores, Column::Score, parse_score)?;
    let green = parse_column(&input.green, Column::Green, parse_count)?;
    let amber = parse_column(&input.amber, Column::Amber, parse_count)?;
    let red = parse_column(&input.red, Column::Red, parse_count)?;

    let counts = ColumnCounts(vec![
        (Column::Label, labels.len()),
        (Column::Score, scores.len()),
        (Column::Green, green.len()),
        (Column::Amber, amber.len()),
        (Column::Red, red.len()),
    ]);
    if counts.0.iter().any(|(_, count)| *count != labels.len()) {
        debug!(%counts, "column lengths disagree");
        return Err(ChartError::LengthMismatch { counts });
    }

    if labels.len() > config.max_rows {
        return Err(ChartError::TooManyRows {
            rows: labels.len(),
            limit: config.max_rows,
        });
    }

    let rows: Vec<KpiRow> = labels
        .into_iter()
        .zip(scores)
        .zip(green.into_iter().zip(amber).zip(red))
        .map(|((label, average_score), ((green, amber), red))| KpiRow {
            label,
            average_score,
            green,
            amber,
            red,
        })
        .collect();

    if let Some((idx, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.checked_total().is_none())
    {
        return Err(ChartError::CountOverflow {
            row: idx + 1,
            label: row.label.clone(),
        });
    }

    Ok(KpiTable::from_rows(rows))
}

/// Trimmed, non-blank lines of one pasted column.
fn entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn parse_column<T>(
    raw: &str,
    column: Column,
    parse: fn(&str) -> Option<T>,
) -> Result<Vec<T>, ChartError> {
    entries(raw)
        .enumerate()
        .map(|(idx, token)| {
            parse(token).ok_or_else(|| ChartError::Parse {
                column,
                entry: idx + 1,
                token: token.to_string(),
                expected: expected_kind(column),
            })
        })
        .collect()
}

fn expected_kind(column: Column) -> &'static str {
    match column {
        Column::Score => "number",
        Column::Label => "label",
        Column::Green | Column::Amber | Column::Red => "whole number",
    }
}

/// `"85%"`, `"85"` and `" 85.5 % "` all parse; non-finite values do not.
fn parse_score(token: &str) -> Option<f64> {
    let number = token.strip_suffix('%').unwrap_or(token).trim();
    number.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_count(token: &str) -> Option<u64> {
    token.parse::<u64>().ok()
}
