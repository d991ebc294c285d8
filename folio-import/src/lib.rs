//! Bulk media import and record reconciliation for the portfolio catalog.
//!
//! This crate owns the import engine: recovering record identities from
//! dropped files, allocating storage slots, planning create/update/skip
//! decisions against existing records, and running the plan in bounded
//! chunks with per-item failure isolation.

pub mod csv_import;
pub mod files;
pub mod planner;
pub mod progress;
pub mod report;
pub mod runner;
pub mod slots;
pub mod store;

use std::path::PathBuf;

use folio_catalog::types::{ImportJob, ImportKind};
use folio_db::{Connection, OperationError, operations};
use thiserror::Error;

pub use csv_import::{RecordRow, import_rows, read_rows};
pub use files::{FileContent, IncomingFile, import_files};
pub use planner::{
    ActionKind, EntryGroup, ExistenceSnapshot, PlanEntry, PlanReason, PlanSummary, PlanTarget,
    PlannedAction, ReconciliationPolicy, group_entries, plan,
};
pub use progress::{JobObserver, JobProgress, LogObserver, SilentObserver};
pub use report::{FailedItem, JobResult, SkippedItem, SuccessItem};
pub use slots::{SlotError, allocate_slot, next_suffix};
pub use store::{BlobStore, RecordStore, SqliteRecords, StoreError};

/// Default number of actions run concurrently per chunk.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Errors that abort a job before any action runs.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
    #[error("Failed to look up existing records: {0}")]
    Snapshot(#[source] StoreError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV input has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that fail a single item (or a single group) while running.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("record {record_id} has no free media slots (a-z all used)")]
    SlotsExhausted { record_id: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SlotError> for ItemError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::SlotsExhausted { record_id } => ItemError::SlotsExhausted { record_id },
            SlotError::Store(e) => ItemError::Store(e),
        }
    }
}

/// Per-job settings.
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub policy: ReconciliationPolicy,
    /// Width of each concurrent chunk. Must be at least 1.
    pub batch_size: usize,
    /// Re-capture the existence snapshot once, right before running.
    pub refresh_snapshot: bool,
    /// Plan only; touch nothing.
    pub dry_run: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            policy: ReconciliationPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            refresh_snapshot: false,
            dry_run: false,
        }
    }
}

impl JobOptions {
    pub fn validate(&self) -> Result<(), JobError> {
        if self.batch_size == 0 {
            return Err(JobError::InvalidBatchSize);
        }
        Ok(())
    }
}

/// What a job hands back: the plan it made and what came of it.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub result: JobResult,
    pub summary: PlanSummary,
    pub plan: Vec<PlanEntry>,
    pub dry_run: bool,
}

impl JobReport {
    /// Report for a dry run: the plan, with only plan-decided items filled in.
    pub fn planned<T: PlanTarget>(actions: &[PlannedAction<T>]) -> Self {
        Self {
            result: runner::preview(actions),
            summary: PlanSummary::from_actions(actions),
            plan: actions.iter().map(PlanEntry::from_action).collect(),
            dry_run: true,
        }
    }

    pub fn finished<T: PlanTarget>(actions: &[PlannedAction<T>], result: JobResult) -> Self {
        Self {
            result,
            summary: PlanSummary::from_actions(actions),
            plan: actions.iter().map(PlanEntry::from_action).collect(),
            dry_run: false,
        }
    }
}

/// Append a finished job to the import job log.
pub fn log_job(
    conn: &Connection,
    kind: ImportKind,
    source: &str,
    started_at: &str,
    report: &JobReport,
) -> Result<i64, OperationError> {
    let job = ImportJob {
        id: 0,
        kind: kind.as_str().to_string(),
        source: source.to_string(),
        started_at: started_at.to_string(),
        finished_at: chrono::Utc::now().to_rfc3339(),
        succeeded: report.result.success.len() as u64,
        failed: report.result.failed.len() as u64,
        skipped: report.result.skipped.len() as u64,
        dry_run: report.dry_run,
    };
    operations::insert_import_job(conn, &job)
}
