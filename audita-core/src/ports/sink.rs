// audita-core/src/ports/sink.rs

use crate::domain::report::ReportBundle;
use crate::error::AuditaError;
use async_trait::async_trait;

/// Where the four report tables go. The engine is agnostic to the persisted
/// format — workbook sheets, JSON files, a warehouse load, all fair game.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, bundle: &ReportBundle) -> Result<(), AuditaError>;
}
