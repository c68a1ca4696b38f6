//! Planning exporter adapters.

mod text_exporter;

pub use text_exporter::TextPlanningExporter;
