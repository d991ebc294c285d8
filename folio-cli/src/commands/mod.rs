pub(crate) mod config;
pub(crate) mod history;
pub(crate) mod import;
pub(crate) mod media;
pub(crate) mod parse;
pub(crate) mod records;

use std::path::Path;

use folio_db::Connection;

use crate::CliError;

/// Open (or create) the catalog database.
pub(crate) fn open_catalog(db_path: &Path) -> Result<Connection, CliError> {
    folio_db::open_database(db_path).map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog database at {}: {}",
            db_path.display(),
            e
        ))
    })
}

/// Single-threaded runtime: every store call is awaited on this thread.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to start async runtime: {}", e)))
}

/// Truncate a string to a maximum width (in chars), appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}
