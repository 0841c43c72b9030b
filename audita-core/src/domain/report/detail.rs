// audita-core/src/domain/report/detail.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::rules::ErrorLabel;

/// One finding column of the error detail table: the report column name and
/// the label emitted for it (or null). Kept as a pair so the table carries
/// its own header, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFinding {
    pub column: String,
    pub label: Option<ErrorLabel>,
}

/// One row of the report-ready error detail table: identity fields,
/// enrichment fields, the per-field findings and the derived error count.
/// Date fields are calendar dates here — time-of-day is display noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetailRow {
    pub client_uid: String,
    pub user_creating: String,
    pub user_updating: String,
    pub ban_start_date: NaiveDate,
    pub display_name: Option<String>,
    pub department: Option<String>,
    pub findings: Vec<FieldFinding>,
    pub error_count: usize,
}
