// audita-core/src/application/project.rs

use crate::domain::report::{ErrorDetailRow, FieldFinding};
use crate::domain::rules::{AnnotatedRecord, RuleCatalog};

/// Projects annotated records onto the report-ready error detail table:
/// identity columns, enrichment columns, one finding column per monitored
/// field (catalog order) and the derived error count. Timestamps collapse
/// to calendar dates so re-exports of the same data stay diff-stable.
pub fn project(annotated: &[AnnotatedRecord], catalog: &RuleCatalog) -> Vec<ErrorDetailRow> {
    annotated
        .iter()
        .map(|rec| {
            let findings: Vec<FieldFinding> = catalog
                .rules()
                .iter()
                .zip(rec.findings.iter())
                .map(|(rule, label)| FieldFinding {
                    column: rule.field.column_name().to_string(),
                    label: *label,
                })
                .collect();

            ErrorDetailRow {
                client_uid: rec.record.incident.client_uid.clone(),
                user_creating: rec.record.incident.user_creating.clone(),
                user_updating: rec.record.incident.user_updating.clone(),
                ban_start_date: rec.record.incident.ban_start_date.date(),
                display_name: rec.record.display_name.clone(),
                department: rec.record.department.clone(),
                // Recomputed from the findings, not copied: the count must
                // track the number of active rules.
                error_count: findings.iter().filter(|f| f.label.is_some()).count(),
                findings,
            }
        })
        .collect()
}
