// audita-core/src/application/pipeline.rs

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{aggregate, enrich, project};
use crate::domain::record::EnrichedRecord;
use crate::domain::report::ReportBundle;
use crate::domain::rules::{self, AnnotatedRecord, RuleCatalog, RuleSettings};
use crate::error::AuditaError;
use crate::ports::{RecordSource, ReportSink};

/// Records per evaluation chunk. Evaluation is independent per record, so
/// chunking only bounds task overhead at per-agency volumes.
const EVAL_CHUNK_SIZE: usize = 256;
/// Bounded concurrency for the evaluation fan-out.
const EVAL_CONCURRENCY: usize = 8;

/// What a run did, for the caller and for the run log next to the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub records: usize,
    pub flagged_records: usize,
    pub findings_total: u64,
    pub monitored_fields: usize,
}

/// The whole transform: Load -> Enrich -> Evaluate -> Project -> Aggregate
/// -> Publish. Stateless and linear; identical inputs give identical
/// outputs, so the run can be repeated freely.
#[instrument(skip_all)]
pub async fn run_report(
    source: &dyn RecordSource,
    sink: &dyn ReportSink,
    settings: &RuleSettings,
) -> Result<RunSummary, AuditaError> {
    println!("🚀 Starting data-quality report run...");

    // 1. LOAD (Ports)
    let incidents = source.incidents().await?;
    let directory = source.directory().await?;
    println!(
        "📦 Loaded {} incidents, {} directory entries",
        incidents.len(),
        directory.len()
    );

    // 2. COMPILE RULES (Domain)
    let catalog = RuleCatalog::compile(settings).map_err(AuditaError::Domain)?;
    debug!(
        fields = catalog.monitored_field_count(),
        "rule catalog compiled"
    );

    // The raw extract is the incident table re-emitted untouched.
    let raw_extract = incidents.clone();

    // 3. ENRICH (left join; duplicate directory keys abort here)
    let enriched = enrich::enrich(incidents, &directory).map_err(AuditaError::Domain)?;

    // 4. EVALUATE (parallel chunks, re-assembled in input order)
    println!("🧪 Evaluating {} records...", enriched.len());
    let annotated = annotate_all(enriched, &catalog).await;

    let flagged_records = annotated.iter().filter(|a| a.error_count() > 0).count();
    let findings_total: u64 = annotated.iter().map(|a| a.error_count() as u64).sum();

    // 5. PROJECT + AGGREGATE
    let error_detail = project::project(&annotated, &catalog);
    let fields = catalog.monitored_field_count();
    let by_staff =
        aggregate::summarize_by_staff(&error_detail, fields).map_err(AuditaError::Domain)?;
    let by_department =
        aggregate::summarize_by_department(&error_detail, fields).map_err(AuditaError::Domain)?;

    // 6. PUBLISH (Port)
    let bundle = ReportBundle {
        raw_extract,
        error_detail,
        by_staff,
        by_department,
    };
    sink.publish(&bundle).await?;

    let summary = RunSummary {
        records: bundle.raw_extract.len(),
        flagged_records,
        findings_total,
        monitored_fields: fields,
    };
    println!(
        "✨ Done. {} records, {} flagged, {} findings.",
        summary.records, summary.flagged_records, summary.findings_total
    );
    Ok(summary)
}

/// Fans the record set out over fixed-size chunks and re-sorts the results
/// by chunk index: completion order is whatever the executor felt like,
/// output order is the input order, every time.
async fn annotate_all(
    enriched: Vec<EnrichedRecord>,
    catalog: &RuleCatalog,
) -> Vec<AnnotatedRecord> {
    let chunks: Vec<Vec<EnrichedRecord>> = enriched
        .chunks(EVAL_CHUNK_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect();

    let jobs = chunks.into_iter().enumerate().map(|(idx, chunk)| {
        async move {
            let rows: Vec<AnnotatedRecord> = chunk
                .into_iter()
                .map(|rec| rules::annotate(rec, catalog))
                .collect();
            (idx, rows)
        }
    });

    let mut parts: Vec<(usize, Vec<AnnotatedRecord>)> = futures::stream::iter(jobs)
        .buffer_unordered(EVAL_CONCURRENCY)
        .collect()
        .await;

    parts.sort_by_key(|(idx, _)| *idx);
    parts.into_iter().flat_map(|(_, rows)| rows).collect()
}

// --- UNIT TESTS ---
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::record::{DirectoryEntry, IncidentRecord};
    use crate::error::AuditaError;
    use crate::ports::{RecordSource, ReportSink};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    const FLAGGED_PROVIDER: &str = "Transition Projects (TPI) - Agency - SP(19)";

    fn settings() -> RuleSettings {
        RuleSettings {
            flagged_provider: FLAGGED_PROVIDER.into(),
            reinstatement_code: "TPI_Exclusion - Agency (Requires Reinstatement)".into(),
            recognized_types: vec!["Alcohol".into(), "Drugs".into()],
            recognized_codes: vec!["Bar - Other".into()],
            shorthand_token: "uno".into(),
        }
    }

    fn ts(d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    /// Trips none of the rules.
    fn clean_incident(uid: &str, creator: &str) -> IncidentRecord {
        IncidentRecord {
            client_uid: uid.into(),
            user_creating: creator.into(),
            user_updating: creator.into(),
            provider: "Day Center - SP(4)".into(),
            date_added: ts(2),
            ban_start_date: ts(1),
            ban_end_date: Some(ts(20)),
            staff_person: Some("On duty".into()),
            infraction_type: Some("Alcohol".into()),
            infraction_code: Some("Bar - Other".into()),
            banned_sites: Some("All sites".into()),
            notes: Some("documented at intake".into()),
        }
    }

    /// Trips all seven rules.
    fn worst_incident(uid: &str, creator: &str) -> IncidentRecord {
        IncidentRecord {
            client_uid: uid.into(),
            user_creating: creator.into(),
            user_updating: creator.into(),
            provider: FLAGGED_PROVIDER.into(),
            date_added: ts(2),
            ban_start_date: ts(1),
            ban_end_date: None,
            staff_person: None,
            infraction_type: None,
            infraction_code: None,
            banned_sites: None,
            notes: None,
        }
    }

    // --- MOCK PORTS ---
    struct MockSource {
        incidents: Vec<IncidentRecord>,
        directory: Vec<DirectoryEntry>,
    }

    #[async_trait]
    impl RecordSource for MockSource {
        async fn incidents(&self) -> Result<Vec<IncidentRecord>, AuditaError> {
            Ok(self.incidents.clone())
        }
        async fn directory(&self) -> Result<Vec<DirectoryEntry>, AuditaError> {
            Ok(self.directory.clone())
        }
    }

    #[derive(Clone, Default)]
    struct CaptureSink {
        published: Arc<Mutex<Vec<ReportBundle>>>,
    }

    #[async_trait]
    impl ReportSink for CaptureSink {
        async fn publish(&self, bundle: &ReportBundle) -> Result<(), AuditaError> {
            self.published.lock().unwrap().push(bundle.clone());
            Ok(())
        }
    }

    fn directory() -> Vec<DirectoryEntry> {
        vec![DirectoryEntry {
            user_id: "u_1".into(),
            display_name: "Alice Ngo".into(),
            department: "Shelter".into(),
        }]
    }

    #[tokio::test]
    async fn test_run_report_end_to_end() {
        let source = MockSource {
            incidents: vec![worst_incident("C-1", "u_1"), clean_incident("C-2", "u_1")],
            directory: directory(),
        };
        let sink = CaptureSink::default();

        let summary = run_report(&source, &sink, &settings()).await.unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.flagged_records, 1);
        assert_eq!(summary.findings_total, 7);
        assert_eq!(summary.monitored_fields, 7);

        let published = sink.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let bundle = &published[0];
        assert_eq!(bundle.raw_extract.len(), 2);
        assert_eq!(bundle.error_detail.len(), 2);
        assert_eq!(bundle.by_staff.len(), 1);
        assert_eq!(bundle.by_department.len(), 1);
        assert_eq!(bundle.by_department[0].measures.error_sum, 7);
    }

    #[tokio::test]
    async fn test_by_staff_summary_snapshot() {
        let source = MockSource {
            incidents: vec![worst_incident("C-1", "u_1"), clean_incident("C-2", "u_1")],
            directory: directory(),
        };
        let sink = CaptureSink::default();
        run_report(&source, &sink, &settings()).await.unwrap();

        let published = sink.published.lock().unwrap();
        let yaml = serde_yaml::to_string(&published[0].by_staff).unwrap();
        // 7 findings over 2 records × 7 fields = 0.5
        insta::assert_snapshot!(yaml.trim_end(), @r###"
        - department: Shelter
          staff: Alice Ngo
          record_count: 2
          error_sum: 7
          error_rate: 0.5
        "###);
    }

    #[tokio::test]
    async fn test_run_report_is_idempotent() {
        let source = MockSource {
            incidents: vec![worst_incident("C-1", "u_1"), clean_incident("C-2", "u_404")],
            directory: directory(),
        };
        let sink = CaptureSink::default();

        run_report(&source, &sink, &settings()).await.unwrap();
        run_report(&source, &sink, &settings()).await.unwrap();

        let published = sink.published.lock().unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0], published[1]);
    }

    #[tokio::test]
    async fn test_duplicate_directory_key_aborts_before_publish() {
        let mut dir = directory();
        dir.push(DirectoryEntry {
            user_id: "u_1".into(),
            display_name: "Alice N.".into(),
            department: "Outreach".into(),
        });
        let source = MockSource {
            incidents: vec![clean_incident("C-1", "u_1")],
            directory: dir,
        };
        let sink = CaptureSink::default();

        let result = run_report(&source, &sink, &settings()).await;
        assert!(matches!(
            result,
            Err(AuditaError::Domain(
                crate::domain::DomainError::AmbiguousDirectoryKey(_)
            ))
        ));
        // No partial output
        assert!(sink.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chunked_evaluation_matches_sequential() {
        // Enough records to span several chunks
        let incidents: Vec<IncidentRecord> = (0..EVAL_CHUNK_SIZE * 2 + 37)
            .map(|i| {
                if i % 3 == 0 {
                    worst_incident(&format!("C-{i}"), "u_1")
                } else {
                    clean_incident(&format!("C-{i}"), "u_1")
                }
            })
            .collect();

        let catalog = RuleCatalog::compile(&settings()).unwrap();
        let enriched = enrich::enrich(incidents.clone(), &directory()).unwrap();

        let sequential: Vec<AnnotatedRecord> = enriched
            .iter()
            .cloned()
            .map(|rec| rules::annotate(rec, &catalog))
            .collect();
        let chunked = annotate_all(enriched, &catalog).await;

        assert_eq!(chunked, sequential);
    }

    #[tokio::test]
    async fn test_empty_input_produces_empty_bundle() {
        let source = MockSource {
            incidents: vec![],
            directory: directory(),
        };
        let sink = CaptureSink::default();

        let summary = run_report(&source, &sink, &settings()).await.unwrap();
        assert_eq!(summary.records, 0);
        assert_eq!(summary.findings_total, 0);

        let published = sink.published.lock().unwrap();
        assert!(published[0].by_staff.is_empty());
        assert!(published[0].by_department.is_empty());
    }
}
