// audita-core/src/application/mod.rs

pub mod aggregate;
pub mod enrich;
pub mod pipeline;
pub mod project;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use audita_core::application::{run_report, RunSummary};`
// sans avoir à connaître la structure interne des fichiers.

pub use aggregate::{summarize_by_department, summarize_by_staff};
pub use enrich::enrich;
pub use pipeline::{RunSummary, run_report};
pub use project::project;
