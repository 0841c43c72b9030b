// audita-core/src/domain/record.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::rules::MonitoredField;

/// One row of the incident extract, as handed over by the record source.
/// Nullable columns are `Option`: an absent value is data, not an error —
/// the rule catalog decides which absences are findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub client_uid: String,
    pub user_creating: String,
    pub user_updating: String,
    pub provider: String,
    pub date_added: NaiveDateTime,
    pub ban_start_date: NaiveDateTime,
    pub ban_end_date: Option<NaiveDateTime>,
    pub staff_person: Option<String>,
    pub infraction_type: Option<String>,
    pub infraction_code: Option<String>,
    pub banned_sites: Option<String>,
    pub notes: Option<String>,
}

impl IncidentRecord {
    /// Textual view of a monitored field. `BanEndDate` is date-typed and has
    /// no textual value; its predicates go through [`Self::ban_end_present`].
    pub fn field_text(&self, field: MonitoredField) -> Option<&str> {
        match field {
            MonitoredField::Provider => Some(self.provider.as_str()),
            MonitoredField::BanEndDate => None,
            MonitoredField::StaffPerson => self.staff_person.as_deref(),
            MonitoredField::InfractionType => self.infraction_type.as_deref(),
            MonitoredField::InfractionCode => self.infraction_code.as_deref(),
            MonitoredField::ExcludedSites => self.banned_sites.as_deref(),
            MonitoredField::Notes => self.notes.as_deref(),
        }
    }

    pub fn ban_end_present(&self) -> bool {
        self.ban_end_date.is_some()
    }

    /// "Is the field empty" in the sense of the missing-data rules.
    pub fn field_missing(&self, field: MonitoredField) -> bool {
        match field {
            MonitoredField::BanEndDate => self.ban_end_date.is_none(),
            _ => self.field_text(field).is_none(),
        }
    }
}

/// One row of the staff directory. `user_id` is the join key against
/// `IncidentRecord::user_creating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub user_id: String,
    pub display_name: String,
    pub department: String,
}

/// An incident left-joined with its directory entry. An incident whose
/// creator is not in the directory keeps `None` enrichment fields —
/// that is a valid outcome of the join, not a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub incident: IncidentRecord,
    pub display_name: Option<String>,
    pub department: Option<String>,
}
