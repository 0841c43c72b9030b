// audita-core/src/application/enrich.rs

use std::collections::HashMap;

use crate::domain::error::DomainError;
use crate::domain::record::{DirectoryEntry, EnrichedRecord, IncidentRecord};

/// Left outer join of the incident table with the staff directory, keyed on
/// the creating user. Every incident row comes out exactly once; a creator
/// absent from the directory yields null enrichment fields.
///
/// A duplicate key in the directory would fan incident rows out and poison
/// every downstream count, so it aborts the run instead of being resolved
/// by guesswork.
pub fn enrich(
    incidents: Vec<IncidentRecord>,
    directory: &[DirectoryEntry],
) -> Result<Vec<EnrichedRecord>, DomainError> {
    let mut index: HashMap<&str, &DirectoryEntry> = HashMap::with_capacity(directory.len());
    for entry in directory {
        if index.insert(entry.user_id.as_str(), entry).is_some() {
            return Err(DomainError::AmbiguousDirectoryKey(entry.user_id.clone()));
        }
    }

    let enriched = incidents
        .into_iter()
        .map(|incident| {
            let hit = index.get(incident.user_creating.as_str());
            EnrichedRecord {
                display_name: hit.map(|e| e.display_name.clone()),
                department: hit.map(|e| e.department.clone()),
                incident,
            }
        })
        .collect();

    Ok(enriched)
}
