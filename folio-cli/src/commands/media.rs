use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_lib::MediaDir;
use folio_lib::util::format_bytes_approx;

use crate::{AppContext, CliError};

use super::runtime;

/// List stored media for one record, or a per-record overview.
pub(crate) fn run_media_list(ctx: &AppContext, id: Option<u32>) -> Result<(), CliError> {
    let media = MediaDir::new(&ctx.media_root);
    let rt = runtime()?;

    if let Some(id) = id {
        let files = rt.block_on(media.list_files(id))?;
        if files.is_empty() {
            log::info!("No media stored for record {}.", id);
            return Ok(());
        }
        for file in &files {
            log::info!("  {:<24} {:>10}", file.name, format_bytes_approx(file.size));
        }
        return Ok(());
    }

    let ids = rt.block_on(media.record_ids())?;
    if ids.is_empty() {
        log::info!("No media under {}.", media.root().display());
        return Ok(());
    }

    let mut total_files = 0usize;
    let mut total_bytes = 0u64;
    for id in &ids {
        let files = rt.block_on(media.list_files(*id))?;
        let bytes: u64 = files.iter().map(|f| f.size).sum();
        total_files += files.len();
        total_bytes += bytes;
        log::info!(
            "  {:>6}  {:>3} file(s)  {:>10}",
            id,
            files.len(),
            format_bytes_approx(bytes).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();
    log::info!(
        "  {} record(s), {} file(s), {}",
        ids.len(),
        total_files,
        format_bytes_approx(total_bytes),
    );
    Ok(())
}
