//! Chart presentation: SVG rendering, text metrics, export and the form UI.

pub mod export;
pub mod fonts;
pub mod form;
pub mod preview;
pub mod svg;

pub use export::ChartExportPanel;
pub use form::ChartForm;
pub use preview::ChartPreview;
