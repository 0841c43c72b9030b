// audita-core/src/domain/rules/engine.rs

use serde::{Deserialize, Serialize};

use crate::domain::record::EnrichedRecord;
use crate::domain::rules::catalog::{ErrorLabel, RuleCatalog};

/// An enriched record plus its findings, one slot per monitored field in
/// catalog order. A slot is `None` when no predicate of that field matched —
/// never an empty label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    pub record: EnrichedRecord,
    pub findings: Vec<Option<ErrorLabel>>,
}

impl AnnotatedRecord {
    /// Derived error count: non-null labels across the monitored fields.
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_some()).count()
    }
}

/// The generic evaluator. Walks the catalog once per record; per field the
/// first matching predicate wins and the rest of that chain is skipped.
/// Fields are independent of each other, so the walk never branches on
/// field identity.
pub fn annotate(record: EnrichedRecord, catalog: &RuleCatalog) -> AnnotatedRecord {
    let findings = catalog
        .rules()
        .iter()
        .map(|rule| {
            rule.checks
                .iter()
                .find(|check| check.predicate.matches(rule.field, &record.incident))
                .map(|check| check.label)
        })
        .collect();

    AnnotatedRecord { record, findings }
}
