//! Bulk import of dropped media files.
//!
//! parse → group by record → snapshot → plan → run. Every input file ends up
//! in exactly one of `success`, `failed` or `skipped`.
//!
//! A new primary replaces the stored one in place only when the extensions
//! agree. Otherwise (`000005.png` over `000005.jpg`) both files stay, the
//! record points at the new one, and a warning names the stale file.

use std::borrow::Cow;
use std::path::PathBuf;

use folio_catalog::slot_name::stored_slot;
use folio_catalog::{ParsedEntry, RecordFields, StoredSlotName, default_record_title, parse_filename};

use crate::planner::{
    ActionKind, EntryGroup, ExistenceSnapshot, PlanTarget, PlannedAction, group_entries, plan,
};
use crate::progress::JobObserver;
use crate::report::JobResult;
use crate::slots::allocate_slot;
use crate::store::{BlobStore, RecordStore};
use crate::{ItemError, JobError, JobOptions, JobReport, runner};

/// Where an incoming file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Read from disk when the file is stored.
    Path(PathBuf),
    /// Already in memory (e.g., an upload body).
    Inline(Vec<u8>),
}

/// One file offered to a bulk import.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Name the identity is parsed from.
    pub name: String,
    pub content: FileContent,
}

impl IncomingFile {
    /// A file on disk, named by its final path component.
    ///
    /// Returns `None` for paths without a UTF-8 file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = folio_lib::util::file_name_string(&path)?;
        Some(Self {
            name,
            content: FileContent::Path(path),
        })
    }

    pub fn inline(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: FileContent::Inline(bytes.into()),
        }
    }

    async fn read(&self) -> Result<Cow<'_, [u8]>, ItemError> {
        match &self.content {
            FileContent::Inline(bytes) => Ok(Cow::Borrowed(bytes)),
            FileContent::Path(path) => tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .map_err(|source| ItemError::Read {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// An incoming file together with its parsed identity.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub entry: ParsedEntry,
    pub file: IncomingFile,
}

impl AsRef<ParsedEntry> for ParsedFile {
    fn as_ref(&self) -> &ParsedEntry {
        &self.entry
    }
}

/// What the planner sees for a file import.
#[derive(Debug, Clone)]
pub enum FileTarget {
    Group(EntryGroup<ParsedFile>),
    Unmatched(ParsedFile),
}

impl PlanTarget for FileTarget {
    fn record_id(&self) -> Option<u32> {
        match self {
            FileTarget::Group(g) => Some(g.record_id),
            FileTarget::Unmatched(_) => None,
        }
    }

    fn item_names(&self) -> Vec<String> {
        match self {
            FileTarget::Group(g) => g.source_names(),
            FileTarget::Unmatched(f) => vec![f.entry.source_name.clone()],
        }
    }
}

/// Parse and group files into plan targets: record groups in ascending id
/// order, then unmatched files in input order.
pub fn file_targets(files: Vec<IncomingFile>) -> Vec<FileTarget> {
    let parsed: Vec<ParsedFile> = files
        .into_iter()
        .map(|file| ParsedFile {
            entry: parse_filename(&file.name),
            file,
        })
        .collect();

    let (groups, unmatched) = group_entries(parsed);
    for f in &unmatched {
        log::debug!("Unrecognized file name: {}", f.entry.source_name);
    }
    groups
        .into_iter()
        .map(FileTarget::Group)
        .chain(unmatched.into_iter().map(FileTarget::Unmatched))
        .collect()
}

/// Import a batch of media files.
///
/// Fails as a whole only when planning fails (bad options, or the stores
/// cannot be queried for the snapshot). Per-file problems are reported in
/// the result.
pub async fn import_files<R, B>(
    files: Vec<IncomingFile>,
    records: &R,
    blobs: &B,
    options: &JobOptions,
    observer: &dyn JobObserver,
) -> Result<JobReport, JobError>
where
    R: RecordStore + ?Sized,
    B: BlobStore + ?Sized,
{
    options.validate()?;

    observer.on_phase(&format!("Planning {} file(s)", files.len()));
    let targets = file_targets(files);
    let ids: Vec<u32> = targets.iter().filter_map(|t| t.record_id()).collect();

    let snapshot = ExistenceSnapshot::capture(records, blobs, &ids)
        .await
        .map_err(JobError::Snapshot)?;
    let mut actions = plan(targets, &snapshot, &options.policy);

    if options.dry_run {
        return Ok(JobReport::planned(&actions));
    }

    if options.refresh_snapshot {
        let snapshot = ExistenceSnapshot::capture(records, blobs, &ids)
            .await
            .map_err(JobError::Snapshot)?;
        let targets = actions.into_iter().map(|a| a.target).collect();
        actions = plan(targets, &snapshot, &options.policy);
    }

    observer.on_phase(&format!("Importing {} record group(s)", ids.len()));
    let result = runner::run(
        "files",
        &actions,
        options.batch_size,
        |action| perform_file_action(records, blobs, action),
        observer,
    )
    .await;

    Ok(JobReport::finished(&actions, result))
}

async fn perform_file_action<R, B>(
    records: &R,
    blobs: &B,
    action: &PlannedAction<FileTarget>,
) -> Result<JobResult, ItemError>
where
    R: RecordStore + ?Sized,
    B: BlobStore + ?Sized,
{
    match &action.target {
        FileTarget::Group(group) => store_group(records, blobs, action.kind, group).await,
        // Unmatched files are always planned as skips.
        FileTarget::Unmatched(_) => Ok(JobResult::default()),
    }
}

/// Store every file of one group, primary slot first.
///
/// A failure before the first file (record creation, listing) fails the
/// whole group; after that each file succeeds or fails on its own.
async fn store_group<R, B>(
    records: &R,
    blobs: &B,
    kind: ActionKind,
    group: &EntryGroup<ParsedFile>,
) -> Result<JobResult, ItemError>
where
    R: RecordStore + ?Sized,
    B: BlobStore + ?Sized,
{
    let id = group.record_id;

    if kind == ActionKind::Create {
        let title = group
            .title_hint()
            .map(str::to_string)
            .unwrap_or_else(|| default_record_title(id));
        records.create_record(id, &RecordFields::titled(title)).await?;
        log::debug!("Created record {}", id);
    }

    let stored = blobs.list_stored_names(id).await?;
    let stored_primaries: Vec<&String> = stored
        .iter()
        .filter(|n| stored_slot(id, n) == Some(None))
        .collect();
    let promote_first = !group.has_primary_request() && stored_primaries.is_empty();

    let mut result = JobResult::default();
    for (index, parsed) in group.entries.iter().enumerate() {
        let primary = index == 0 && (group.has_primary_request() || promote_first);
        let source = &parsed.entry.source_name;
        match store_file(records, blobs, id, parsed, primary).await {
            Ok(name) => {
                log::debug!("{} -> {}", source, name);
                if primary {
                    for stale in stored_primaries.iter().filter(|n| **n != &name) {
                        log::warn!(
                            "Record {}: {} replaces the primary, {} is left in place",
                            id,
                            name,
                            stale
                        );
                    }
                }
                result.push_success(id, source.clone(), Some(name));
            }
            Err(e) => {
                log::warn!("Failed to store {}: {}", source, e);
                result.push_failed(Some(id), source.clone(), e.to_string());
            }
        }
    }
    Ok(result)
}

async fn store_file<R, B>(
    records: &R,
    blobs: &B,
    id: u32,
    parsed: &ParsedFile,
    primary: bool,
) -> Result<String, ItemError>
where
    R: RecordStore + ?Sized,
    B: BlobStore + ?Sized,
{
    let suffix = allocate_slot(blobs, id, primary).await?;
    let name = StoredSlotName::for_source(id, suffix, &parsed.entry.source_name).to_string();
    let bytes = parsed.file.read().await?;
    blobs.write_blob(id, &name, &bytes).await?;
    if primary {
        records
            .update_record(id, &RecordFields::with_primary_media(name.clone()))
            .await?;
    }
    Ok(name)
}
