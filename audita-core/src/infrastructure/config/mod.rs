// audita-core/src/infrastructure/config/mod.rs

pub mod project;

pub use project::{ProjectConfig, SourceFiles, load_project_config};
