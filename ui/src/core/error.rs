//! Error taxonomy for a single Generate action.
//!
//! Every variant is terminal for the action that raised it: the form shows the
//! `Display` text and stays usable for another attempt.

use std::fmt;

use thiserror::Error;

/// One of the five pasted input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Label,
    Score,
    Green,
    Amber,
    Red,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Label,
        Column::Score,
        Column::Green,
        Column::Amber,
        Column::Red,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Label => "KPI",
            Column::Score => "Average Score (%)",
            Column::Green => "Green",
            Column::Amber => "Amber",
            Column::Red => "Red",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Entry counts per column, reported together when lengths disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCounts(pub Vec<(Column, usize)>);

impl fmt::Display for ColumnCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(column, count)| format!("{column}: {count}"))
            .collect::<Vec<_>>();
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("{column} entry {entry} is not a valid {expected}: \"{token}\"")]
    Parse {
        column: Column,
        /// 1-based position among the non-blank lines of the column.
        entry: usize,
        token: String,
        expected: &'static str,
    },

    #[error("All columns must have the same number of entries ({counts}).")]
    LengthMismatch { counts: ColumnCounts },

    #[error("Row {row} (\"{label}\") has more projects than can be totalled.")]
    CountOverflow { row: usize, label: String },

    #[error("Too many rows to chart legibly: {rows} pasted, limit is {limit}.")]
    TooManyRows { rows: usize, limit: usize },

    #[error("Nothing to chart: paste at least one KPI row.")]
    EmptyTable,

    #[error("An error occurred while rendering the chart: {0}")]
    Render(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl ChartError {
    /// Validation errors come from the pasted text; everything else from rendering or export.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChartError::Parse { .. }
                | ChartError::LengthMismatch { .. }
                | ChartError::CountOverflow { .. }
                | ChartError::TooManyRows { .. }
                | ChartError::EmptyTable
        )
    }
}
