use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_lib::settings::{init_settings, settings_path, settings_to_string};

use crate::{AppContext, CliError};

/// Print the effective settings and resolved locations.
pub(crate) fn run_config_show(ctx: &AppContext) -> Result<(), CliError> {
    let path = settings_path();
    let state = if path.exists() {
        "".to_string()
    } else {
        " (not created, using defaults)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    };
    log::info!(
        "{} {}{}",
        "Settings:".if_supports_color(Stdout, |t| t.bold()),
        path.display(),
        state
    );
    log::info!("  Database:   {}", ctx.db_path.display());
    log::info!("  Media root: {}", ctx.media_root.display());
    crate::log_blank();

    let text = settings_to_string(&ctx.settings).map_err(|e| CliError::config(e.to_string()))?;
    for line in text.lines() {
        log::info!("{}", line);
    }
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

/// Write a default settings file.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = settings_path();
    let written = init_settings(&path, force).map_err(|e| CliError::config(e.to_string()))?;
    if written {
        log::info!(
            "{} Wrote default settings to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display()
        );
    } else {
        log::warn!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}
