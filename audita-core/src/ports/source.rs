// audita-core/src/ports/source.rs

// This port defines what the pipeline needs from the outside world, without
// knowing how the tables got there. Spreadsheets, exports, fixtures — the
// engine only ever sees already-typed rows.

use crate::domain::record::{DirectoryEntry, IncidentRecord};
use crate::error::AuditaError;
use async_trait::async_trait;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// The incident extract, one typed row per reported infraction.
    async fn incidents(&self) -> Result<Vec<IncidentRecord>, AuditaError>;

    /// The staff directory used for enrichment.
    async fn directory(&self) -> Result<Vec<DirectoryEntry>, AuditaError>;
}
