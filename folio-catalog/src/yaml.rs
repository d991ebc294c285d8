//! YAML loading for hand-curated seed records.
//!
//! A seed file holds a YAML sequence of records:
//! ```yaml
//! - id: 78
//!   title: "Harbour at Dusk"
//!   year: 2019
//!   medium: "Oil on linen"
//! ```
//! A seed directory holds any number of such files, loaded in name order.

use crate::types::SeedRecord;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Seed path not found: {0}")]
    NotFound(String),
}

/// Load seed records from a single YAML file or a directory of YAML files.
pub fn load_records(path: &Path) -> Result<Vec<SeedRecord>, YamlError> {
    if path.is_dir() {
        load_record_dir(path)
    } else if path.is_file() {
        load_record_file(path)
    } else {
        Err(YamlError::NotFound(path.display().to_string()))
    }
}

/// Load one YAML file containing a sequence of records.
pub fn load_record_file(path: &Path) -> Result<Vec<SeedRecord>, YamlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_yml::from_str(&contents).map_err(|e| YamlError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load every `.yaml`/`.yml` file in a directory, sorted by file name.
fn load_record_dir(dir: &Path) -> Result<Vec<SeedRecord>, YamlError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| YamlError::Io {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut all = Vec::new();
    for entry in entries {
        all.extend(load_record_file(&entry.path())?);
    }
    Ok(all)
}
