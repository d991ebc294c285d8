//! Directory-backed media store.
//!
//! Each record owns one directory named by its zero-padded id:
//! `<root>/000078/000078.jpg`, `<root>/000078/000078a.png`, ... The
//! directory listing is the source of truth for which names are taken.

use std::io;
use std::path::{Path, PathBuf};

use folio_catalog::record_prefix;

/// Suffix marking an in-flight write. Files carrying it are never listed.
const PARTIAL_SUFFIX: &str = ".partial";

/// One stored media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct MediaDir {
    root: PathBuf,
}

impl MediaDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a record's media.
    pub fn record_dir(&self, record_id: u32) -> PathBuf {
        self.root.join(record_prefix(record_id))
    }

    /// Stored files for a record, sorted by name. A record without a
    /// directory has no files.
    pub async fn list_files(&self, record_id: u32) -> io::Result<Vec<StoredFile>> {
        let dir = self.record_dir(record_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || name.ends_with(PARTIAL_SUFFIX) {
                continue;
            }
            files.push(StoredFile {
                name,
                size: meta.len(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Stored file names for a record, sorted.
    pub async fn list_names(&self, record_id: u32) -> io::Result<Vec<String>> {
        Ok(self
            .list_files(record_id)
            .await?
            .into_iter()
            .map(|f| f.name)
            .collect())
    }

    /// Record ids that have a media directory, ascending.
    pub async fn record_ids(&self) -> io::Result<Vec<u32>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(id) = entry
                .file_name()
                .to_str()
                .filter(|n| n.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|&id| id > 0)
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Write `bytes` as `filename` in the record's directory, replacing any
    /// file of that name.
    ///
    /// Data goes to a partial file first and is renamed into place, so a
    /// listing never observes a half-written file.
    pub async fn write(&self, record_id: u32, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        validate_filename(filename)?;
        let dir = self.record_dir(record_id);
        tokio::fs::create_dir_all(&dir).await?;

        let target = dir.join(filename);
        let partial = dir.join(format!(".{filename}{PARTIAL_SUFFIX}"));
        tokio::fs::write(&partial, bytes).await?;
        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        log::debug!("Wrote {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }
}

fn validate_filename(filename: &str) -> io::Result<()> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
        || filename.starts_with('.');
    if bad {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid media file name '{filename}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_record_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let media = MediaDir::new(tmp.path());
        assert!(media.list_names(78).await.unwrap().is_empty());
        assert!(media.record_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_then_list() {
        let tmp = TempDir::new().unwrap();
        let media = MediaDir::new(tmp.path().join("media"));

        media.write(78, "000078a.png", b"second").await.unwrap();
        let path = media.write(78, "000078.jpg", b"primary").await.unwrap();
        assert_eq!(path, tmp.path().join("media").join("000078").join("000078.jpg"));

        let files = media.list_files(78).await.unwrap();
        assert_eq!(
            files,
            vec![
                StoredFile {
                    name: "000078.jpg".into(),
                    size: 7
                },
                StoredFile {
                    name: "000078a.png".into(),
                    size: 6
                },
            ]
        );
        assert_eq!(media.record_ids().await.unwrap(), vec![78]);
    }

    #[tokio::test]
    async fn write_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let media = MediaDir::new(tmp.path());
        media.write(1, "000001.jpg", b"old").await.unwrap();
        media.write(1, "000001.jpg", b"newer").await.unwrap();
        let path = media.record_dir(1).join("000001.jpg");
        assert_eq!(std::fs::read(path).unwrap(), b"newer");
        assert_eq!(media.list_names(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn partial_and_hidden_files_are_not_listed() {
        let tmp = TempDir::new().unwrap();
        let media = MediaDir::new(tmp.path());
        let dir = media.record_dir(5);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(".000005.jpg.partial"), b"x").unwrap();
        std::fs::write(dir.join("000005b.jpg"), b"x").unwrap();
        assert_eq!(media.list_names(5).await.unwrap(), vec!["000005b.jpg"]);
    }

    #[tokio::test]
    async fn rejects_path_like_names() {
        let tmp = TempDir::new().unwrap();
        let media = MediaDir::new(tmp.path());
        for name in ["", "..", "../escape.jpg", "a/b.jpg", ".hidden"] {
            let err = media.write(1, name, b"x").await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{name}");
        }
    }

    #[tokio::test]
    async fn record_ids_ignore_foreign_dirs() {
        let tmp = TempDir::new().unwrap();
        for dir in ["000002", "000010", "thumbs", "000000"] {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        std::fs::write(tmp.path().join("000003"), b"file").unwrap();
        let media = MediaDir::new(tmp.path());
        assert_eq!(media.record_ids().await.unwrap(), vec![2, 10]);
    }
}
