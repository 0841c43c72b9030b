// audita-core/src/application/aggregate.rs

use std::collections::BTreeMap;

use crate::domain::error::DomainError;
use crate::domain::report::{
    DepartmentSummaryRow, ErrorDetailRow, GroupMeasures, StaffSummaryRow,
};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    records: u64,
    errors: u64,
}

/// By-staff summary, grouped on (department, staff display name). BTreeMap
/// keys give a stable lexicographic output order with null groups first —
/// iteration order of the groups carries no meaning, reproducibility does.
pub fn summarize_by_staff(
    rows: &[ErrorDetailRow],
    monitored_fields: usize,
) -> Result<Vec<StaffSummaryRow>, DomainError> {
    let mut groups: BTreeMap<(Option<String>, Option<String>), Tally> = BTreeMap::new();
    for row in rows {
        let key = (row.department.clone(), row.display_name.clone());
        let tally = groups.entry(key).or_default();
        tally.records += 1;
        tally.errors += row.error_count as u64;
    }

    groups
        .into_iter()
        .map(|((department, staff), tally)| {
            let group = format!(
                "{} / {}",
                department.as_deref().unwrap_or("<no department>"),
                staff.as_deref().unwrap_or("<no staff>")
            );
            Ok(StaffSummaryRow {
                department,
                staff,
                measures: measures(tally, monitored_fields, &group)?,
            })
        })
        .collect()
}

/// By-department summary; same measures, coarser key.
pub fn summarize_by_department(
    rows: &[ErrorDetailRow],
    monitored_fields: usize,
) -> Result<Vec<DepartmentSummaryRow>, DomainError> {
    let mut groups: BTreeMap<Option<String>, Tally> = BTreeMap::new();
    for row in rows {
        let tally = groups.entry(row.department.clone()).or_default();
        tally.records += 1;
        tally.errors += row.error_count as u64;
    }

    groups
        .into_iter()
        .map(|(department, tally)| {
            let group = department
                .clone()
                .unwrap_or_else(|| "<no department>".into());
            Ok(DepartmentSummaryRow {
                department,
                measures: measures(tally, monitored_fields, &group)?,
            })
        })
        .collect()
}

/// Rate = errors / (records × monitored fields). Groups are built from
/// existing rows so a zero denominator cannot happen; if it ever does the
/// input was corrupted and we fail instead of emitting NaN.
fn measures(
    tally: Tally,
    monitored_fields: usize,
    group: &str,
) -> Result<GroupMeasures, DomainError> {
    if tally.records == 0 {
        return Err(DomainError::EmptyAggregationGroup(group.to_string()));
    }
    if monitored_fields == 0 {
        return Err(DomainError::InvalidRuleSettings(
            "no monitored fields: rate denominator would be zero".into(),
        ));
    }

    let denominator = tally.records as f64 * monitored_fields as f64;
    Ok(GroupMeasures {
        record_count: tally.records,
        error_sum: tally.errors,
        error_rate: tally.errors as f64 / denominator,
    })
}
