//! Platform-agnostic chart logic: parsing, derived metrics and the render plan.

pub mod config;
pub mod derive;
pub mod error;
pub mod format;
pub mod parse;
pub mod plan;
pub mod platform;
pub mod table;

use tracing::{debug, info};

pub use config::ChartConfig;
pub use error::ChartError;
pub use plan::{ChartOptions, RenderPlan};
pub use table::{KpiInput, KpiTable};

/// One Generate action: parse the pasted columns and resolve the render plan.
///
/// Nothing is cached between calls; the same input always yields the same plan.
pub fn generate(
    input: &KpiInput,
    options: &ChartOptions,
    config: &ChartConfig,
) -> Result<RenderPlan, ChartError> {
    let table = parse::parse_table(input, config)?;
    debug!(rows = table.len(), "parsed KPI table");
    let plan = RenderPlan::build(&table, options)?;
    info!(
        rows = plan.categories.len(),
        bar_mode = ?plan.bar_mode,
        legend = ?plan.legend_mode,
        "render plan ready"
    );
    Ok(plan)
}
