// audita-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Ambiguous staff directory: duplicate entry for creator id '{0}'")]
    #[diagnostic(
        code(audita::domain::join),
        help(
            "The directory table carries more than one row for this id. A left join \
             would fan incident rows out and miscount every summary; fix the \
             directory export instead."
        )
    )]
    AmbiguousDirectoryKey(String),

    #[error("Invalid rule settings: {0}")]
    #[diagnostic(
        code(audita::domain::rules),
        help("Check the `rules:` section of the project configuration.")
    )]
    InvalidRuleSettings(String),

    #[error("Aggregation produced an empty group '{0}'")]
    #[diagnostic(
        code(audita::domain::aggregate),
        help("Group keys are derived from existing rows; an empty group means the input table was corrupted in flight.")
    )]
    EmptyAggregationGroup(String),
}
