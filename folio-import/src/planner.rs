//! Reconciliation planning: decide what to do with each group of files (or
//! CSV row) given which records already exist and the job's policy.
//!
//! Planning is pure. The existence snapshot is captured up front and passed
//! in explicitly, so a plan can be inspected (dry run) before anything is
//! written.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use folio_catalog::ParsedEntry;
use serde::{Deserialize, Serialize};

use crate::store::{BlobStore, RecordStore, StoreError};

// ── Policy ──────────────────────────────────────────────────────────────────

/// How a job treats records that are missing or already populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPolicy {
    /// Create missing records instead of failing.
    pub auto_create: bool,
    /// Allow updating records that already exist.
    pub overwrite_existing: bool,
    /// Skip existing records that already hold at least one stored file,
    /// even when overwriting is allowed.
    pub skip_if_target_has_media: bool,
}

// ── Snapshot ────────────────────────────────────────────────────────────────

/// Point-in-time view of which records exist and which hold media.
///
/// Captured once per job and never updated in place. A record created by
/// someone else after capture surfaces later as a per-item conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceSnapshot {
    existing: HashSet<u32>,
    with_media: HashSet<u32>,
}

impl ExistenceSnapshot {
    pub fn new(
        existing: impl IntoIterator<Item = u32>,
        with_media: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            existing: existing.into_iter().collect(),
            with_media: with_media.into_iter().collect(),
        }
    }

    /// Query the stores for the given ids.
    ///
    /// Media is only looked up for ids that exist.
    pub async fn capture<R, B>(records: &R, blobs: &B, ids: &[u32]) -> Result<Self, StoreError>
    where
        R: RecordStore + ?Sized,
        B: BlobStore + ?Sized,
    {
        let existing = records.existing_ids(ids).await?;
        let mut with_media = HashSet::new();
        for &id in &existing {
            if !blobs.list_stored_names(id).await?.is_empty() {
                with_media.insert(id);
            }
        }
        log::debug!(
            "Snapshot: {} of {} record(s) exist, {} with media",
            existing.len(),
            ids.len(),
            with_media.len()
        );
        Ok(Self {
            existing,
            with_media,
        })
    }

    pub fn exists(&self, id: u32) -> bool {
        self.existing.contains(&id)
    }

    pub fn has_media(&self, id: u32) -> bool {
        self.with_media.contains(&id)
    }
}

// ── Groups ──────────────────────────────────────────────────────────────────

/// All entries destined for one record, in slot order: the primary request
/// first, then lettered requests ascending, ties broken by source name.
#[derive(Debug, Clone)]
pub struct EntryGroup<E = ParsedEntry> {
    pub record_id: u32,
    pub entries: Vec<E>,
}

impl<E: AsRef<ParsedEntry>> EntryGroup<E> {
    /// True when the first entry asked for the primary slot.
    ///
    /// Only the first entry can hold the primary slot; later entries that
    /// also asked for it are placed in lettered slots.
    pub fn has_primary_request(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|e| e.as_ref().is_primary())
    }

    /// The first non-empty title hint in slot order.
    pub fn title_hint(&self) -> Option<&str> {
        self.entries
            .iter()
            .map(|e| e.as_ref().title_hint.as_str())
            .find(|t| !t.is_empty())
    }

    pub fn source_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.as_ref().source_name.clone())
            .collect()
    }
}

/// Group parsed entries by record.
///
/// Groups come back in ascending record order. Entries no rule matched are
/// returned separately, in input order.
pub fn group_entries<E: AsRef<ParsedEntry>>(items: Vec<E>) -> (Vec<EntryGroup<E>>, Vec<E>) {
    let mut by_record: BTreeMap<u32, Vec<E>> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for item in items {
        match item.as_ref().record_id {
            Some(id) => by_record.entry(id).or_default().push(item),
            None => unmatched.push(item),
        }
    }

    let groups = by_record
        .into_iter()
        .map(|(record_id, mut entries)| {
            entries.sort_by(|a, b| {
                let (a, b) = (a.as_ref(), b.as_ref());
                a.slot_suffix
                    .cmp(&b.slot_suffix)
                    .then_with(|| a.source_name.cmp(&b.source_name))
            });
            let primaries = entries.iter().filter(|e| e.as_ref().is_primary()).count();
            if primaries > 1 {
                log::warn!(
                    "Record {}: {} files ask for the primary slot; keeping '{}', the rest get lettered slots",
                    record_id,
                    primaries,
                    entries[0].as_ref().source_name
                );
            }
            EntryGroup { record_id, entries }
        })
        .collect();

    (groups, unmatched)
}

// ── Plan ────────────────────────────────────────────────────────────────────

/// Something the planner can classify: a group of files, an unmatched file,
/// or a CSV row.
pub trait PlanTarget {
    /// The record this target refers to, if one could be recovered.
    fn record_id(&self) -> Option<u32>;

    /// Names reported for this target (one per file, or a row label).
    fn item_names(&self) -> Vec<String>;
}

impl<E: AsRef<ParsedEntry>> PlanTarget for EntryGroup<E> {
    fn record_id(&self) -> Option<u32> {
        Some(self.record_id)
    }

    fn item_names(&self) -> Vec<String> {
        self.source_names()
    }
}

impl PlanTarget for ParsedEntry {
    fn record_id(&self) -> Option<u32> {
        self.record_id
    }

    fn item_names(&self) -> Vec<String> {
        vec![self.source_name.clone()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Update,
    Skip,
    Fail,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Skip => "skip",
            ActionKind::Fail => "fail",
        }
    }

    /// Whether the runner has work to do for this action.
    pub fn is_actionable(&self) -> bool {
        matches!(self, ActionKind::Create | ActionKind::Update)
    }
}

/// Why the planner chose an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanReason {
    MissingTarget,
    CreateMissing,
    AlreadyExists,
    AlreadyHasMedia,
    Overwrite,
    UnrecognizedName,
    DuplicateInInput,
}

impl fmt::Display for PlanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PlanReason::MissingTarget => "record must be created first",
            PlanReason::CreateMissing => "record will be created",
            PlanReason::AlreadyExists => "already exists, overwrite off",
            PlanReason::AlreadyHasMedia => "already has media, skip-if-exists on",
            PlanReason::Overwrite => "record exists, overwrite on",
            PlanReason::UnrecognizedName => "unrecognized name",
            PlanReason::DuplicateInInput => "duplicate record id in input",
        };
        f.write_str(text)
    }
}

/// One planned action.
#[derive(Debug, Clone)]
pub struct PlannedAction<T> {
    pub record_id: Option<u32>,
    pub kind: ActionKind,
    pub reason: PlanReason,
    pub target: T,
}

/// The decision table for a target whose record id is known.
pub fn decide(
    exists: bool,
    has_media: bool,
    policy: &ReconciliationPolicy,
) -> (ActionKind, PlanReason) {
    match (exists, policy.auto_create, policy.overwrite_existing) {
        (false, false, _) => (ActionKind::Fail, PlanReason::MissingTarget),
        (false, true, _) => (ActionKind::Create, PlanReason::CreateMissing),
        (true, _, false) => (ActionKind::Skip, PlanReason::AlreadyExists),
        (true, _, true) if policy.skip_if_target_has_media && has_media => {
            (ActionKind::Skip, PlanReason::AlreadyHasMedia)
        }
        (true, _, true) => (ActionKind::Update, PlanReason::Overwrite),
    }
}

/// Classify every target. Output order matches input order.
///
/// A record id seen on an earlier target is skipped so that no two actions
/// in one job touch the same record.
pub fn plan<T: PlanTarget>(
    targets: Vec<T>,
    snapshot: &ExistenceSnapshot,
    policy: &ReconciliationPolicy,
) -> Vec<PlannedAction<T>> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .map(|target| {
            let record_id = target.record_id();
            let (kind, reason) = match record_id {
                None => (ActionKind::Skip, PlanReason::UnrecognizedName),
                Some(id) if !seen.insert(id) => (ActionKind::Skip, PlanReason::DuplicateInInput),
                Some(id) => decide(snapshot.exists(id), snapshot.has_media(id), policy),
            };
            PlannedAction {
                record_id,
                kind,
                reason,
                target,
            }
        })
        .collect()
}

/// Action counts for a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub skip: usize,
    pub fail: usize,
    /// Skips caused by unparseable names (included in `skip`).
    pub unrecognized: usize,
}

impl PlanSummary {
    pub fn from_actions<T>(actions: &[PlannedAction<T>]) -> Self {
        let mut summary = Self::default();
        for action in actions {
            match action.kind {
                ActionKind::Create => summary.create += 1,
                ActionKind::Update => summary.update += 1,
                ActionKind::Skip => summary.skip += 1,
                ActionKind::Fail => summary.fail += 1,
            }
            if action.reason == PlanReason::UnrecognizedName {
                summary.unrecognized += 1;
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.create + self.update + self.skip + self.fail
    }
}

/// A serializable view of one planned action, for dry runs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub record_id: Option<u32>,
    pub kind: ActionKind,
    pub reason: String,
    pub items: Vec<String>,
}

impl PlanEntry {
    pub fn from_action<T: PlanTarget>(action: &PlannedAction<T>) -> Self {
        Self {
            record_id: action.record_id,
            kind: action.kind,
            reason: action.reason.to_string(),
            items: action.target.item_names(),
        }
    }
}
