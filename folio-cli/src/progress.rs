//! Terminal progress bar for import jobs.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_import::{FailedItem, JobObserver, JobProgress, JobResult};

/// [`JobObserver`] drawing an indicatif bar, one tick per chunk.
pub(crate) struct CliJobProgress {
    bar: ProgressBar,
}

impl CliJobProgress {
    pub(crate) fn new(hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            let style = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            let bar = ProgressBar::new(0);
            bar.set_style(style);
            bar
        };
        Self { bar }
    }
}

impl JobObserver for CliJobProgress {
    fn on_phase(&self, message: &str) {
        log::debug!("{}", message);
        self.bar.set_message(message.to_string());
    }

    fn on_progress(&self, progress: &JobProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.done as u64);
    }

    fn on_failure(&self, item: &FailedItem) {
        self.bar.suspend(|| {
            log::warn!(
                "  {} {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                item.filename,
                item.reason,
            );
        });
    }

    fn on_complete(&self, _result: &JobResult) {
        self.bar.finish_and_clear();
    }
}
