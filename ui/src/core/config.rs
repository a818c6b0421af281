//! Chart configuration: canvas size, validation limits, export names.

use serde::{Deserialize, Serialize};

/// Title pre-filled in the form.
pub const DEFAULT_TITLE: &str = "Modern Infrastructure KPI Performance";

/// Caption used when the title field is blank.
pub const FALLBACK_TITLE: &str = "KPI Chart";

/// Preset titles offered next to the free-form title input.
pub const TITLE_PRESETS: &[&str] = &[
    DEFAULT_TITLE,
    "Project Delivery Status by KPI",
    "Quarterly KPI Health Check",
    "Service Performance Overview",
];

pub const PNG_FILENAME: &str = "kpi_chart.png";
pub const PNG_MIME: &str = "image/png";
pub const CSV_FILENAME: &str = "kpi_data.csv";
pub const CSV_MIME: &str = "text/csv";
pub const JSON_FILENAME: &str = "kpi_data.json";
pub const JSON_MIME: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Rendered canvas width in px (also the PNG width).
    pub width: u32,
    /// Rendered canvas height in px.
    pub height: u32,
    /// Upper bound on pasted rows; more is reported as a validation error.
    pub max_rows: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        // 14 x 7 inch figure at 100 dpi.
        Self {
            width: 1400,
            height: 700,
            max_rows: 200,
        }
    }
}

/// Example rows for the "Load sample data" button.
pub struct SampleData;

impl SampleData {
    pub const LABELS: &'static str = "Network Uptime\nPatch Compliance\nBackup Success\nIncident Response\nCloud Migration\nAccess Reviews";
    pub const SCORES: &'static str = "92%\n74%\n81%\n58%\n66%\n88%";
    pub const GREEN: &'static str = "18\n9\n14\n4\n7\n12";
    pub const AMBER: &'static str = "2\n6\n3\n5\n6\n2";
    pub const RED: &'static str = "0\n3\n1\n6\n2\n0";
}
