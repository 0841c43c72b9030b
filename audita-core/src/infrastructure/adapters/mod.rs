// audita-core/src/infrastructure/adapters/mod.rs

pub mod json;

pub use json::{JsonReportSink, JsonTableSource};
