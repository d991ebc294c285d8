//! Drop-folder scanner for bulk media imports.
//!
//! Lists the files a user dropped into a folder, filtered by extension and
//! sorted by name so that import plans are reproducible run to run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extensions accepted by default when no filter is configured.
const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "tif", "tiff", "heic", "avif",
];

/// The default image extension set.
pub fn default_media_extensions() -> HashSet<String> {
    extension_set(MEDIA_EXTENSIONS)
}

/// Build a lowercase extension set, tolerating a leading dot.
pub fn extension_set<S: AsRef<str>>(extensions: &[S]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Scan a folder (non-recursively) for media files.
///
/// Hidden files are ignored. An empty `extensions` set accepts every file.
pub fn scan_drop_folder(
    folder: &Path,
    extensions: &HashSet<String>,
) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && !is_hidden(p))
        .filter(|p| extensions.is_empty() || has_matching_extension(p, extensions))
        .collect();
    files.sort();
    log::debug!("Scanned {}: {} file(s)", folder.display(), files.len());
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(true)
}

fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scan_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["414King.JPG", "078.jpg", "notes.txt", ".DS_Store", "001a_view.png"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(tmp.path().join("nested.jpg")).unwrap();

        let files = scan_drop_folder(tmp.path(), &default_media_extensions()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["001a_view.png", "078.jpg", "414King.JPG"]);
    }

    #[test]
    fn empty_filter_accepts_everything_visible() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("cover"), b"x").unwrap();
        std::fs::write(tmp.path().join(".hidden"), b"x").unwrap();
        let files = scan_drop_folder(tmp.path(), &HashSet::new()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn extension_set_normalizes() {
        let set = extension_set(&[".JPG", "png", ""]);
        assert!(set.contains("jpg"));
        assert!(set.contains("png"));
        assert_eq!(set.len(), 2);
    }
}
