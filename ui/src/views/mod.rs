mod generator;
mod guide;

pub use generator::Generator;
pub use guide::Guide;
