// audita-core/src/domain/report/summary.rs

use serde::{Deserialize, Serialize};

use crate::domain::record::IncidentRecord;
use crate::domain::report::detail::ErrorDetailRow;

/// Rate-normalized measures of one group. `error_rate` is
/// `error_sum / (record_count × monitored fields)` — the denominator comes
/// from the active catalog, so adding or removing a monitored field moves
/// every rate automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeasures {
    pub record_count: u64,
    pub error_sum: u64,
    pub error_rate: f64,
}

/// One row of the by-staff summary, keyed on (department, staff member).
/// Records whose creator is absent from the directory group under null keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffSummaryRow {
    pub department: Option<String>,
    pub staff: Option<String>,
    #[serde(flatten)]
    pub measures: GroupMeasures,
}

/// One row of the by-department summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummaryRow {
    pub department: Option<String>,
    #[serde(flatten)]
    pub measures: GroupMeasures,
}

/// The four tables a report sink persists: the raw incident extract, the
/// annotated error detail, and the two summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub raw_extract: Vec<IncidentRecord>,
    pub error_detail: Vec<ErrorDetailRow>,
    pub by_staff: Vec<StaffSummaryRow>,
    pub by_department: Vec<DepartmentSummaryRow>,
}
