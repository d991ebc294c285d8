//! Job progress reporting.

use crate::report::{FailedItem, JobResult};

/// Progress of a running job, reported after every chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub phase: String,
    pub done: usize,
    pub total: usize,
}

/// Trait for receiving job progress updates.
pub trait JobObserver {
    /// Called when a phase starts (e.g., "Planning 120 files").
    fn on_phase(&self, message: &str);

    /// Called after each chunk settles. `done` never decreases.
    fn on_progress(&self, progress: &JobProgress);

    /// Called for every item that fails while running.
    fn on_failure(&self, _item: &FailedItem) {}

    /// Called once with the final result.
    fn on_complete(&self, result: &JobResult);
}

/// A no-op observer that discards all updates.
pub struct SilentObserver;

impl JobObserver for SilentObserver {
    fn on_phase(&self, _message: &str) {}
    fn on_progress(&self, _progress: &JobProgress) {}
    fn on_complete(&self, _result: &JobResult) {}
}

/// An observer that logs to the `log` crate.
pub struct LogObserver;

impl JobObserver for LogObserver {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_progress(&self, progress: &JobProgress) {
        log::info!("  [{}/{}] {}", progress.done, progress.total, progress.phase);
    }

    fn on_failure(&self, item: &FailedItem) {
        log::warn!("  {}: {}", item.filename, item.reason);
    }

    fn on_complete(&self, result: &JobResult) {
        log::info!(
            "Done: {} succeeded, {} failed, {} skipped",
            result.success.len(),
            result.failed.len(),
            result.skipped.len()
        );
    }
}
