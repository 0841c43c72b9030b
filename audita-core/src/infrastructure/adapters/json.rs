// audita-core/src/infrastructure/adapters/json.rs

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::record::{DirectoryEntry, IncidentRecord};
use crate::domain::report::ReportBundle;
use crate::error::AuditaError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::{RecordSource, ReportSink};

pub const RAW_EXTRACT_FILE: &str = "raw_extract.json";
pub const ERROR_DETAIL_FILE: &str = "error_detail.json";
pub const BY_STAFF_FILE: &str = "summary_by_staff.json";
pub const BY_DEPARTMENT_FILE: &str = "summary_by_department.json";

/// Record source over two JSON array files. Deserialization is the schema
/// check: a missing column, a mistyped value or an unparseable date fails
/// the whole load — a typed half-table is worse than no table.
pub struct JsonTableSource {
    incidents_path: PathBuf,
    directory_path: PathBuf,
}

impl JsonTableSource {
    pub fn new(incidents_path: impl Into<PathBuf>, directory_path: impl Into<PathBuf>) -> Self {
        Self {
            incidents_path: incidents_path.into(),
            directory_path: directory_path.into(),
        }
    }
}

#[async_trait]
impl RecordSource for JsonTableSource {
    async fn incidents(&self) -> Result<Vec<IncidentRecord>, AuditaError> {
        Ok(load_table(&self.incidents_path)?)
    }

    async fn directory(&self) -> Result<Vec<DirectoryEntry>, AuditaError> {
        Ok(load_table(&self.directory_path)?)
    }
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InfrastructureError> {
    debug!(path = ?path, "loading table");
    let content = fs::read_to_string(path).map_err(InfrastructureError::Io)?;
    serde_json::from_str(&content).map_err(|source| InfrastructureError::Table {
        path: path.to_path_buf(),
        source,
    })
}

/// Report sink writing the four tables as pretty JSON under the target
/// directory, each through an atomic rename.
pub struct JsonReportSink {
    target_dir: PathBuf,
}

impl JsonReportSink {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }
}

#[async_trait]
impl ReportSink for JsonReportSink {
    async fn publish(&self, bundle: &ReportBundle) -> Result<(), AuditaError> {
        save_table(&self.target_dir.join(RAW_EXTRACT_FILE), &bundle.raw_extract)?;
        save_table(&self.target_dir.join(ERROR_DETAIL_FILE), &bundle.error_detail)?;
        save_table(&self.target_dir.join(BY_STAFF_FILE), &bundle.by_staff)?;
        save_table(
            &self.target_dir.join(BY_DEPARTMENT_FILE),
            &bundle.by_department,
        )?;
        Ok(())
    }
}

fn save_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), InfrastructureError> {
    let content = serde_json::to_string_pretty(rows).map_err(InfrastructureError::Json)?;
    atomic_write(path, content)
}

// --- UNIT TESTS ---
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    const INCIDENTS: &str = r#"[
        {
            "client_uid": "C-1001",
            "user_creating": "u_204",
            "user_updating": "u_204",
            "provider": "Day Center - SP(4)",
            "date_added": "2024-03-02T09:30:00",
            "ban_start_date": "2024-03-01T00:00:00",
            "ban_end_date": null,
            "staff_person": "R. Alvarez",
            "infraction_type": "Alcohol",
            "infraction_code": "Bar - Other",
            "banned_sites": "All sites",
            "notes": "documented at intake"
        }
    ]"#;

    const DIRECTORY: &str = r#"[
        { "user_id": "u_204", "display_name": "R. Alvarez", "department": "Shelter" }
    ]"#;

    #[tokio::test]
    async fn test_source_loads_typed_tables() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("incidents.json"), INCIDENTS)?;
        fs::write(dir.path().join("staff.json"), DIRECTORY)?;

        let source = JsonTableSource::new(
            dir.path().join("incidents.json"),
            dir.path().join("staff.json"),
        );

        let incidents = source.incidents().await?;
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].client_uid, "C-1001");
        assert_eq!(incidents[0].ban_end_date, None);

        let directory = source.directory().await?;
        assert_eq!(directory[0].department, "Shelter");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_column_is_fatal() -> Result<()> {
        let dir = tempdir()?;
        // No "provider" column
        fs::write(
            dir.path().join("incidents.json"),
            r#"[ { "client_uid": "C-1" } ]"#,
        )?;
        fs::write(dir.path().join("staff.json"), DIRECTORY)?;

        let source = JsonTableSource::new(
            dir.path().join("incidents.json"),
            dir.path().join("staff.json"),
        );
        let result = source.incidents().await;
        assert!(matches!(
            result,
            Err(AuditaError::Infrastructure(InfrastructureError::Table { .. }))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_date_is_fatal_not_a_finding() -> Result<()> {
        // Type-coercion policy: a bad date rejects the run, it does not
        // demote to a data-quality label.
        let dir = tempdir()?;
        let bad = INCIDENTS.replace("2024-03-01T00:00:00", "March 1st, 2024");
        fs::write(dir.path().join("incidents.json"), bad)?;
        fs::write(dir.path().join("staff.json"), DIRECTORY)?;

        let source = JsonTableSource::new(
            dir.path().join("incidents.json"),
            dir.path().join("staff.json"),
        );
        assert!(source.incidents().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_sink_writes_all_four_tables() -> Result<()> {
        let dir = tempdir()?;
        let sink = JsonReportSink::new(dir.path().join("target"));
        let bundle = ReportBundle {
            raw_extract: vec![],
            error_detail: vec![],
            by_staff: vec![],
            by_department: vec![],
        };

        sink.publish(&bundle).await?;

        for file in [
            RAW_EXTRACT_FILE,
            ERROR_DETAIL_FILE,
            BY_STAFF_FILE,
            BY_DEPARTMENT_FILE,
        ] {
            let path = dir.path().join("target").join(file);
            assert!(path.exists(), "missing report table {file}");
            assert_eq!(fs::read_to_string(path)?, "[]");
        }
        Ok(())
    }
}
