//! folio CLI
//!
//! Command-line interface for bulk media import and record reconciliation.

mod cli_types;
mod commands;
mod error;
mod progress;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_lib::Settings;

use cli_types::*;
pub(crate) use error::CliError;

/// Resolved settings and library locations for one invocation.
pub(crate) struct AppContext {
    pub settings: Settings,
    pub db_path: PathBuf,
    pub media_root: PathBuf,
    pub quiet: bool,
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let settings = match folio_lib::settings::load_settings() {
        Ok(s) => s,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let ctx = AppContext {
        db_path: settings.database_path(cli.db),
        media_root: settings.media_root(cli.media_root),
        settings,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Import { source } => match source {
            ImportSource::Files {
                paths,
                extensions,
                job,
            } => commands::import::run_import_files(&ctx, paths, extensions, job),
            ImportSource::Csv { path, job } => commands::import::run_import_csv(&ctx, path, job),
        },
        Commands::Parse { names } => commands::parse::run_parse(names),
        Commands::Records { action } => match action {
            RecordsAction::List { search, limit } => {
                commands::records::run_records_list(&ctx, search, limit)
            }
            RecordsAction::Show { id } => commands::records::run_records_show(&ctx, id),
            RecordsAction::Delete { id } => commands::records::run_records_delete(&ctx, id),
            RecordsAction::Seed { path } => commands::records::run_records_seed(&ctx, path),
        },
        Commands::Media { action } => match action {
            MediaAction::List { id } => commands::media::run_media_list(&ctx, id),
        },
        Commands::History { limit } => commands::history::run_history(&ctx, limit),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Init { force } => commands::config::run_config_init(force),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Install the logger. Normal output goes through `log::info!`, so the
/// default format prints info messages bare.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .target(env_logger::Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("folio_cli", level)
        .filter_module("folio_import", level)
        .filter_module("folio_lib", level)
        .filter_module("folio_db", level)
        .filter_module("folio_catalog", level);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    if !verbose {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            other => writeln!(buf, "[{}] {}", other, record.args()),
        });
    }

    builder.init();
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
