//! Application settings (library locations, import defaults).
//!
//! The settings file lives at `~/.config/folio/settings.toml`. Every field is
//! optional on disk; anything missing falls back to its default, and CLI
//! flags take priority over both.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::default_data_dir;

/// Batch width used when neither the CLI nor the settings file set one.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub import: ImportSettings,
}

/// Where the catalog database and media tree live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    pub database: Option<PathBuf>,
    pub media_root: Option<PathBuf>,
}

/// Defaults for bulk import jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub batch_size: usize,
    pub auto_create: bool,
    pub overwrite_existing: bool,
    pub skip_if_target_has_media: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            auto_create: false,
            overwrite_existing: false,
            skip_if_target_has_media: false,
        }
    }
}

impl Settings {
    /// Resolve the database path: CLI override, then settings, then
    /// `<data dir>/folio/catalog.db`.
    pub fn database_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.library.database.clone())
            .unwrap_or_else(|| default_data_dir().join("catalog.db"))
    }

    /// Resolve the media root: CLI override, then settings, then
    /// `<data dir>/folio/media`.
    pub fn media_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.library.media_root.clone())
            .unwrap_or_else(|| default_data_dir().join("media"))
    }
}

/// Canonical path to the settings file: `~/.config/folio/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("folio").join("settings.toml")
}

/// Load settings from the canonical path.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&settings_path())
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write settings to `path` atomically (temp file, then rename).
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let serialized = toml::to_string_pretty(settings)?;
    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, serialized).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Write a default settings file unless one already exists (or `force`).
///
/// Returns `true` if a file was written.
pub fn init_settings(path: &Path, force: bool) -> Result<bool, SettingsError> {
    if path.exists() && !force {
        return Ok(false);
    }
    save_settings_to(path, &Settings::default())?;
    Ok(true)
}

/// The effective settings as pretty-printed TOML, for display.
pub fn settings_to_string(settings: &Settings) -> Result<String, SettingsError> {
    Ok(toml::to_string_pretty(settings)?)
}
