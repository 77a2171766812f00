//! Run driver: configuration in, SQL files out.
//!
//! # Example
//!
//! ```rust,ignore
//! use usage_translator::{run, TracingSink, TranslatorConfig};
//!
//! let config = TranslatorConfig::from_path("translator.json".as_ref())?;
//! let summary = run(&config, &TracingSink)?;
//! println!("{} chargeable rows", summary.chargeable_rows);
//! ```
//!
//! Files are written one after the other, chargeable first. A failure later
//! in the run leaves earlier files on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::TranslatorConfig;
use crate::error::{PipelineError, PipelineResult, RenderError};
use crate::events::EventSink;
use crate::models::InputRecord;
use crate::parser::read_report;
use crate::reference::ReferenceData;
use crate::render::{render_insert, TableRow};

use super::chargeable::{build_chargeable, ChargeableDrops, ChargeableOutcome};
use super::domains::{build_domains, DomainsOutcome};

/// Both output tables, computed from one read of the report.
#[derive(Debug, Clone, Default)]
pub struct Translation {
    pub chargeable: ChargeableOutcome,
    pub domains: DomainsOutcome,
}

/// Counts and timing for one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_path: PathBuf,
    pub encoding: String,
    pub rows_read: usize,
    pub chargeable_rows: usize,
    pub chargeable_drops: ChargeableDrops,
    pub unmapped_products: usize,
    pub domain_rows: usize,
    pub duplicate_domains: usize,
    pub unsafe_domains: usize,
}

/// Apply both table transformations to already-read records.
pub fn translate(
    records: &[InputRecord],
    reference: &ReferenceData,
    sink: &dyn EventSink,
) -> Translation {
    Translation {
        chargeable: build_chargeable(records, reference, sink),
        domains: build_domains(records),
    }
}

/// Execute a full run as described by `config`.
///
/// Record-level problems go to `sink`; anything returned as an error is fatal.
pub fn run(config: &TranslatorConfig, sink: &dyn EventSink) -> PipelineResult<RunSummary> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let span = tracing::info_span!("run", %run_id);
    let _guard = span.enter();

    config.validate()?;
    let reference = ReferenceData::load(config)?;
    let report = read_report(&config.input_path)?;

    let Translation { chargeable, domains } = translate(&report.records, &reference, sink);
    tracing::info!(
        emitted = chargeable.records.len(),
        dropped = chargeable.drops.total(),
        unmapped_products = chargeable.unmapped_products,
        "chargeable rows built"
    );
    tracing::info!(
        emitted = domains.records.len(),
        duplicates = domains.duplicates_skipped,
        unsafe_dropped = domains.unsafe_dropped,
        "domain rows built"
    );

    write_statement(&config.chargeable_output_path, &chargeable.records)?;
    write_statement(&config.domains_output_path, &domains.records)?;

    let summary = RunSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        input_path: config.input_path.clone(),
        encoding: report.encoding,
        rows_read: report.records.len(),
        chargeable_rows: chargeable.records.len(),
        chargeable_drops: chargeable.drops,
        unmapped_products: chargeable.unmapped_products,
        domain_rows: domains.records.len(),
        duplicate_domains: domains.duplicates_skipped,
        unsafe_domains: domains.unsafe_dropped,
    };

    if let Some(path) = &config.summary_path {
        let json = serde_json::to_string_pretty(&summary).map_err(PipelineError::Summary)?;
        write_file(path, &json)?;
    }

    tracing::info!(
        rows_read = summary.rows_read,
        chargeable_rows = summary.chargeable_rows,
        domain_rows = summary.domain_rows,
        "run complete"
    );
    Ok(summary)
}

/// Render `rows` and write the statement to `path`.
///
/// An empty batch writes a comment-only file.
fn write_statement<R: TableRow>(path: &Path, rows: &[R]) -> PipelineResult<()> {
    let content = match render_insert(rows) {
        Ok(sql) => sql,
        Err(RenderError::EmptyBatch { table }) => {
            tracing::warn!(table, path = %path.display(), "no rows to insert");
            format!("-- no rows for table {table}")
        }
        Err(e) => return Err(e.into()),
    };
    write_file(path, &content)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote insert statement");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> PipelineResult<()> {
    std::fs::write(path, format!("{content}\n")).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::models::fixtures::record;
    use std::collections::HashMap;

    #[test]
    fn test_translate_unsafe_plan_leaves_both_tables() {
        let reference = ReferenceData::new(HashMap::new(), &TranslatorConfig::default());
        let bad = InputRecord {
            plan: "O'Brien".into(),
            ..record()
        };
        let translation = translate(&[bad], &reference, &MemorySink::new());

        assert!(translation.chargeable.records.is_empty());
        assert!(translation.domains.records.is_empty());
    }

    #[test]
    fn test_translate_end_to_end_record() {
        let reference = ReferenceData::new(HashMap::new(), &TranslatorConfig::default());
        let translation = translate(&[record()], &reference, &MemorySink::new());

        let row = &translation.chargeable.records[0];
        assert_eq!(row.partner_id, 1);
        assert_eq!(row.partner_purchase_plan_id, "ABC123");
        assert_eq!(row.usage, 2);
        assert_eq!(translation.domains.records[0].domain, "x.com");
    }

    #[test]
    fn test_empty_batch_writes_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.sql");
        let rows: Vec<crate::models::DomainRecord> = Vec::new();

        write_statement(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "-- no rows for table domains\n");
    }

    #[test]
    fn test_unwritable_output_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.sql");
        let err = write_file(&path, "x").unwrap_err();
        assert!(matches!(err, PipelineError::Write { .. }));
    }
}
