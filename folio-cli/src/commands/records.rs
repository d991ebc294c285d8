use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_lib::MediaDir;
use folio_lib::util::format_bytes_approx;

use crate::{AppContext, CliError};

use super::{open_catalog, runtime, truncate_str};

/// List records, or search them by title.
pub(crate) fn run_records_list(
    ctx: &AppContext,
    search: Option<String>,
    limit: Option<u32>,
) -> Result<(), CliError> {
    let conn = open_catalog(&ctx.db_path)?;

    let records = match &search {
        Some(query) => folio_db::search_records(&conn, query),
        None => folio_db::list_records(&conn, limit),
    }
    .map_err(|e| CliError::database(e.to_string()))?;

    if records.is_empty() {
        match search {
            Some(query) => log::info!("No records match \"{}\".", query),
            None => log::info!("The catalog has no records."),
        }
        return Ok(());
    }

    for record in &records {
        let year = record
            .year
            .map(|y| y.to_string())
            .unwrap_or_default();
        let media = if record.primary_media.is_some() {
            "\u{25a0}".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "\u{25a1}".if_supports_color(Stdout, |t| t.dimmed()).to_string()
        };
        log::info!(
            "  {} {:>6}  {:<48} {}",
            media,
            record.id,
            truncate_str(&record.title, 48),
            year.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let total = folio_db::count_records(&conn).map_err(|e| CliError::database(e.to_string()))?;
    crate::log_blank();
    log::info!("  {} of {} record(s)", records.len(), total);
    Ok(())
}

/// Show one record and the media stored for it.
pub(crate) fn run_records_show(ctx: &AppContext, id: u32) -> Result<(), CliError> {
    let conn = open_catalog(&ctx.db_path)?;
    let record = folio_db::get_record(&conn, id)
        .map_err(|e| CliError::database(e.to_string()))?
        .ok_or_else(|| CliError::other(format!("Record {} not found", id)))?;

    log::info!(
        "{} {}",
        format!("#{}", record.id).if_supports_color(Stdout, |t| t.bold()),
        record.title.if_supports_color(Stdout, |t| t.bold()),
    );
    let fields = [
        ("Year", record.year.map(|y| y.to_string())),
        ("Medium", record.medium.clone()),
        ("Dimensions", record.dimensions.clone()),
        ("Description", record.description.clone()),
        ("Primary", record.primary_media.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            log::info!("  {:<12} {}", format!("{}:", label), value);
        }
    }
    log::info!(
        "  {:<12} {}",
        "Updated:",
        record.updated_at.if_supports_color(Stdout, |t| t.dimmed()),
    );

    let media = MediaDir::new(&ctx.media_root);
    let files = runtime()?.block_on(media.list_files(id))?;
    crate::log_blank();
    if files.is_empty() {
        log::info!("  No media stored in {}", media.record_dir(id).display());
        return Ok(());
    }
    log::info!("  Media ({}):", files.len());
    for file in &files {
        let marker = if record.primary_media.as_deref() == Some(file.name.as_str()) {
            "*"
        } else {
            " "
        };
        log::info!(
            "   {} {:<24} {:>10}",
            marker,
            file.name,
            format_bytes_approx(file.size),
        );
    }
    Ok(())
}

/// Delete one record. Its media directory is not touched.
pub(crate) fn run_records_delete(ctx: &AppContext, id: u32) -> Result<(), CliError> {
    let conn = open_catalog(&ctx.db_path)?;
    folio_db::delete_record(&conn, id).map_err(|e| match e {
        folio_db::OperationError::NotFound { .. } => {
            CliError::other(format!("Record {} not found", id))
        }
        other => CliError::database(other.to_string()),
    })?;

    log::info!(
        "{} Deleted record {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        id
    );
    let media = MediaDir::new(&ctx.media_root);
    let stored = runtime()?.block_on(media.list_names(id))?;
    if !stored.is_empty() {
        log::warn!(
            "{} media file(s) remain in {}",
            stored.len(),
            media.record_dir(id).display()
        );
    }
    Ok(())
}

/// Load record definitions from YAML and insert or update them.
pub(crate) fn run_records_seed(ctx: &AppContext, path: PathBuf) -> Result<(), CliError> {
    let seeds = folio_catalog::load_records(&path)
        .map_err(|e| CliError::other(format!("Failed to load {}: {}", path.display(), e)))?;
    if seeds.is_empty() {
        log::warn!("No records found in {}", path.display());
        return Ok(());
    }

    let conn = open_catalog(&ctx.db_path)?;
    let stats = folio_db::seed_records(&conn, &seeds)
        .map_err(|e| CliError::database(format!("Failed to seed records: {}", e)))?;

    log::info!(
        "{} Seeded {} record(s): {} created, {} updated",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        seeds.len(),
        stats.created,
        stats.updated,
    );
    Ok(())
}
