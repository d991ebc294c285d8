use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_catalog::ImportKind;
use folio_import::{
    ActionKind, IncomingFile, JobObserver, JobOptions, JobReport, LogObserver,
    ReconciliationPolicy, SqliteRecords, import_files, import_rows, log_job, read_rows,
};
use folio_lib::{MediaDir, Settings, default_media_extensions, extension_set, scan_drop_folder};

use crate::cli_types::JobArgs;
use crate::progress::CliJobProgress;
use crate::{AppContext, CliError};

use super::{open_catalog, runtime};

/// Import media files (and the contents of any folders given).
pub(crate) fn run_import_files(
    ctx: &AppContext,
    paths: Vec<PathBuf>,
    extensions: Option<Vec<String>>,
    job: JobArgs,
) -> Result<(), CliError> {
    let extensions = extensions
        .map(|e| extension_set(&e))
        .unwrap_or_else(default_media_extensions);

    let mut files = Vec::new();
    for path in &paths {
        if path.is_dir() {
            let found = scan_drop_folder(path, &extensions)?;
            log::debug!("{}: {} file(s)", path.display(), found.len());
            files.extend(found.into_iter().filter_map(IncomingFile::from_path));
        } else {
            match IncomingFile::from_path(path) {
                Some(f) => files.push(f),
                None => log::warn!("Ignoring path without a file name: {}", path.display()),
            }
        }
    }

    if files.is_empty() {
        log::warn!("No files to import.");
        return Ok(());
    }

    let options = job_options(&ctx.settings, &job);
    let records = SqliteRecords::new(open_catalog(&ctx.db_path)?);
    let media = MediaDir::new(&ctx.media_root);
    let observer = job_observer(ctx, &job);
    let started_at = chrono::Utc::now().to_rfc3339();

    log::info!(
        "{}",
        format!(
            "{} {} file(s) into {}",
            if options.dry_run { "Planning" } else { "Importing" },
            files.len(),
            ctx.media_root.display()
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );

    let report = runtime()?
        .block_on(import_files(files, &records, &media, &options, observer.as_ref()))
        .map_err(|e| CliError::import(e.to_string()))?;

    let source = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    record_job(&records, ImportKind::Files, &source, &started_at, &report);
    print_report(&report, job.json)
}

/// Create or update records from a CSV file.
pub(crate) fn run_import_csv(ctx: &AppContext, path: PathBuf, job: JobArgs) -> Result<(), CliError> {
    let file = std::fs::File::open(&path)
        .map_err(|e| CliError::other(format!("Failed to open {}: {}", path.display(), e)))?;
    let rows = read_rows(file).map_err(|e| CliError::import(e.to_string()))?;

    if rows.is_empty() {
        log::warn!("No rows in {}.", path.display());
        return Ok(());
    }

    let options = job_options(&ctx.settings, &job);
    let records = SqliteRecords::new(open_catalog(&ctx.db_path)?);
    let media = MediaDir::new(&ctx.media_root);
    let observer = job_observer(ctx, &job);
    let started_at = chrono::Utc::now().to_rfc3339();

    log::info!(
        "{}",
        format!("Applying {} row(s) from {}", rows.len(), path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );

    let report = runtime()?
        .block_on(import_rows(rows, &records, &media, &options, observer.as_ref()))
        .map_err(|e| CliError::import(e.to_string()))?;

    record_job(
        &records,
        ImportKind::Csv,
        &path.display().to_string(),
        &started_at,
        &report,
    );
    print_report(&report, job.json)
}

/// Merge CLI flags over the settings file.
fn job_options(settings: &Settings, job: &JobArgs) -> JobOptions {
    let defaults = &settings.import;
    JobOptions {
        policy: ReconciliationPolicy {
            auto_create: job.auto_create || defaults.auto_create,
            overwrite_existing: job.overwrite || defaults.overwrite_existing,
            skip_if_target_has_media: job.skip_if_has_media || defaults.skip_if_target_has_media,
        },
        batch_size: job.batch_size.unwrap_or(defaults.batch_size),
        refresh_snapshot: job.refresh,
        dry_run: job.dry_run,
    }
}

/// Progress bar normally; plain log lines when debug output would tear it.
fn job_observer(ctx: &AppContext, job: &JobArgs) -> Box<dyn JobObserver> {
    if ctx.verbose && !job.json {
        Box::new(LogObserver)
    } else {
        Box::new(CliJobProgress::new(ctx.quiet || job.json))
    }
}

fn record_job(
    records: &SqliteRecords,
    kind: ImportKind,
    source: &str,
    started_at: &str,
    report: &JobReport,
) {
    match records.with_conn(|conn| log_job(conn, kind, source, started_at, report)) {
        Ok(Ok(id)) => log::debug!("Logged import job #{}", id),
        Ok(Err(e)) => log::warn!("Failed to log import job: {}", e),
        Err(e) => log::warn!("Failed to log import job: {}", e),
    }
}

fn print_report(report: &JobReport, json: bool) -> Result<(), CliError> {
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| CliError::other(format!("Failed to serialize report: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    if report.dry_run {
        log::info!("{}", "Plan (dry run)".if_supports_color(Stdout, |t| t.bold()));
        for entry in &report.plan {
            let id = entry
                .record_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let kind = format!("{:<6}", entry.kind.as_str());
            let kind = match entry.kind {
                ActionKind::Create => kind.if_supports_color(Stdout, |t| t.green()).to_string(),
                ActionKind::Update => kind.if_supports_color(Stdout, |t| t.cyan()).to_string(),
                ActionKind::Skip => kind.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
                ActionKind::Fail => kind.if_supports_color(Stdout, |t| t.red()).to_string(),
            };
            log::info!(
                "  {} {:>7}  {}  {}",
                kind,
                id,
                entry.items.join(", "),
                format!("({})", entry.reason).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        crate::log_blank();
    } else {
        for item in &report.result.skipped {
            log::info!(
                "  {} {}: {}",
                "-".if_supports_color(Stdout, |t| t.dimmed()),
                item.filename.as_deref().unwrap_or("?"),
                item.reason,
            );
        }
        for item in &report.result.success {
            log::debug!(
                "  {} {} -> {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                item.filename,
                item.stored_name.as_deref().unwrap_or("record"),
            );
        }
    }

    let summary = &report.summary;
    log::info!(
        "  Plan: {} create, {} update, {} skip ({} unrecognized), {} fail",
        summary.create,
        summary.update,
        summary.skip,
        summary.unrecognized,
        summary.fail,
    );

    if !report.dry_run {
        let result = &report.result;
        let mark = if result.has_failures() {
            "\u{2718}".if_supports_color(Stdout, |t| t.red()).to_string()
        } else {
            "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string()
        };
        log::info!(
            "  {} {} succeeded, {} failed, {} skipped",
            mark,
            result.success.len(),
            result.failed.len(),
            result.skipped.len(),
        );
    }
    Ok(())
}
