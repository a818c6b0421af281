//! Typed KPI rows produced by the parser.

use serde::{Deserialize, Serialize};

/// The five raw text blobs exactly as pasted into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KpiInput {
    pub labels: String,
    pub scores: String,
    pub green: String,
    pub amber: String,
    pub red: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRow {
    pub label: String,
    pub average_score: f64,
    pub green: u64,
    pub amber: u64,
    pub red: u64,
}

impl KpiRow {
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// `None` when the three counts do not fit in one `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.green.checked_add(self.amber)?.checked_add(self.red)
    }

    pub fn counts(&self) -> [u64; 3] {
        [self.green, self.amber, self.red]
    }
}

/// Rows in input order. Only the parser builds one, so every row is fully typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiTable {
    rows: Vec<KpiRow>,
}

impl KpiTable {
    pub(crate) fn from_rows(rows: Vec<KpiRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[KpiRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.label.as_str())
    }
}
