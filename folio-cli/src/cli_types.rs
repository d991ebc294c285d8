//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio")]
#[command(
    about = "Bulk media import and record reconciliation for a portfolio catalog",
    long_about = None
)]
pub(crate) struct Cli {
    /// Catalog database file (overrides settings)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Media root directory (overrides settings)
    #[arg(long, global = true)]
    pub media_root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Reconciliation and execution flags shared by the import commands.
///
/// Boolean policy flags can only switch a setting on; the settings file
/// supplies the defaults.
#[derive(Args, Clone)]
pub(crate) struct JobArgs {
    /// Create records that do not exist yet
    #[arg(long)]
    pub auto_create: bool,

    /// Update records that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Skip existing records that already hold media (with --overwrite)
    #[arg(long)]
    pub skip_if_has_media: bool,

    /// Number of operations run concurrently per chunk
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Re-check which records exist right before writing
    #[arg(long)]
    pub refresh: bool,

    /// Show the plan without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import media files or CSV rows
    Import {
        #[command(subcommand)]
        source: ImportSource,
    },

    /// Show how file names are interpreted, without importing
    Parse {
        /// File names (or paths) to parse
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Inspect and seed catalog records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Inspect stored media
    Media {
        #[command(subcommand)]
        action: MediaAction,
    },

    /// Show recent import jobs
    History {
        /// Maximum number of jobs to show
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ImportSource {
    /// Import media files; directories are scanned for image files
    Files {
        /// Files and/or drop folders
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Extensions accepted when scanning folders (e.g., jpg,png)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Create or update records from a CSV file with an `id` column
    Csv {
        /// CSV file path
        path: PathBuf,

        #[command(flatten)]
        job: JobArgs,
    },
}

#[derive(Subcommand)]
pub(crate) enum RecordsAction {
    /// List records
    List {
        /// Only records whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show one record and its media
    Show {
        /// Record id
        id: u32,
    },

    /// Delete a record (stored media is left on disk)
    Delete {
        /// Record id
        id: u32,
    },

    /// Create or update records from a YAML file or directory
    Seed {
        /// YAML file, or directory of YAML files
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub(crate) enum MediaAction {
    /// List stored media for one record, or all records with media
    List {
        /// Record id
        id: Option<u32>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}
