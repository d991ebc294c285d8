//! Shared infrastructure for the folio workspace: settings, drop-folder
//! scanning, and the directory-backed media store.

pub mod media_dir;
pub mod scanner;
pub mod settings;
pub mod util;

pub use media_dir::{MediaDir, StoredFile};
pub use scanner::{default_media_extensions, extension_set, scan_drop_folder};
pub use settings::{ImportSettings, LibrarySettings, Settings, SettingsError};
