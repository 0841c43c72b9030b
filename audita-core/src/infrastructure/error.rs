// audita-core/src/infrastructure/error.rs

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(audita::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(audita::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    Yaml(#[from] serde_yaml::Error),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(audita::infra::config_missing))]
    ConfigNotFound(String),

    // --- TABLES (JSON) ---
    // A missing column, a mistyped column or an unparseable date all land
    // here; the run aborts before any record is processed.
    #[error("Table {path:?} failed to parse: {source}")]
    #[diagnostic(
        code(audita::infra::table),
        help(
            "Every row must carry the full column set with the right types \
             (dates as 'YYYY-MM-DDTHH:MM:SS'). The engine refuses partial \
             tables rather than guessing."
        )
    )]
    Table {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(audita::infra::json))]
    Json(#[from] serde_json::Error),
}
