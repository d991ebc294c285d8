use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::{AppContext, CliError};

use super::{open_catalog, truncate_str};

/// Show the most recent import jobs.
pub(crate) fn run_history(ctx: &AppContext, limit: u32) -> Result<(), CliError> {
    let conn = open_catalog(&ctx.db_path)?;
    let jobs = folio_db::list_import_jobs(&conn, Some(limit))
        .map_err(|e| CliError::database(e.to_string()))?;

    if jobs.is_empty() {
        log::info!("No imports recorded yet.");
        return Ok(());
    }

    for job in &jobs {
        let outcome = format!(
            "{} ok, {} failed, {} skipped",
            job.succeeded, job.failed, job.skipped
        );
        let outcome = if job.failed > 0 {
            outcome.if_supports_color(Stdout, |t| t.red()).to_string()
        } else {
            outcome
        };
        log::info!(
            "  {:>4}  {}  {:<5} {:<40} {}{}",
            job.id,
            job.started_at.if_supports_color(Stdout, |t| t.dimmed()),
            job.kind,
            truncate_str(&job.source, 40),
            outcome,
            if job.dry_run { "  (dry run)" } else { "" },
        );
    }
    Ok(())
}
