#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use folio_catalog::RecordFields;
use folio_import::{BlobStore, JobObserver, JobProgress, JobResult, RecordStore, StoreError};

/// In-memory record store with optional injected failures.
#[derive(Default)]
pub struct MemoryRecords {
    pub records: RefCell<BTreeMap<u32, RecordFields>>,
    pub fail_ids: HashSet<u32>,
    pub existence_checks: Cell<usize>,
}

impl MemoryRecords {
    pub fn with_ids(ids: &[u32]) -> Self {
        let store = Self::default();
        for &id in ids {
            store
                .records
                .borrow_mut()
                .insert(id, RecordFields::titled(format!("Existing {id}")));
        }
        store
    }

    pub fn get(&self, id: u32) -> Option<RecordFields> {
        self.records.borrow().get(&id).cloned()
    }
}

impl RecordStore for MemoryRecords {
    async fn exists_record(&self, id: u32) -> Result<bool, StoreError> {
        self.existence_checks.set(self.existence_checks.get() + 1);
        Ok(self.records.borrow().contains_key(&id))
    }

    async fn create_record(&self, id: u32, fields: &RecordFields) -> Result<u32, StoreError> {
        if self.fail_ids.contains(&id) {
            return Err(StoreError::backend("connection reset"));
        }
        let mut records = self.records.borrow_mut();
        if records.contains_key(&id) {
            return Err(StoreError::Conflict(id));
        }
        records.insert(id, fields.clone());
        Ok(id)
    }

    async fn update_record(&self, id: u32, fields: &RecordFields) -> Result<(), StoreError> {
        if self.fail_ids.contains(&id) {
            return Err(StoreError::backend("connection reset"));
        }
        let mut records = self.records.borrow_mut();
        let existing = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(title) = &fields.title {
            existing.title = Some(title.clone());
        }
        if let Some(year) = fields.year {
            existing.year = Some(year);
        }
        if let Some(medium) = &fields.medium {
            existing.medium = Some(medium.clone());
        }
        if let Some(name) = &fields.primary_media {
            existing.primary_media = Some(name.clone());
        }
        Ok(())
    }
}

/// In-memory blob store: names per record plus the bytes last written.
#[derive(Default)]
pub struct MemoryBlobs {
    pub files: RefCell<BTreeMap<u32, BTreeMap<String, Vec<u8>>>>,
    pub fail_writes_for: HashSet<u32>,
}

impl MemoryBlobs {
    pub fn seed(&self, record_id: u32, names: &[&str]) {
        let mut files = self.files.borrow_mut();
        let dir = files.entry(record_id).or_default();
        for name in names {
            dir.insert(name.to_string(), Vec::new());
        }
    }

    pub fn names(&self, record_id: u32) -> Vec<String> {
        self.files
            .borrow()
            .get(&record_id)
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl BlobStore for MemoryBlobs {
    async fn list_stored_names(&self, record_id: u32) -> Result<Vec<String>, StoreError> {
        Ok(self.names(record_id))
    }

    async fn write_blob(
        &self,
        record_id: u32,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        if self.fail_writes_for.contains(&record_id) {
            return Err(StoreError::backend("quota exceeded"));
        }
        self.files
            .borrow_mut()
            .entry(record_id)
            .or_default()
            .insert(filename.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Observer that keeps every progress update.
#[derive(Default)]
pub struct RecordingObserver {
    pub phases: RefCell<Vec<String>>,
    pub progress: RefCell<Vec<JobProgress>>,
    pub failures: Cell<usize>,
    pub completed: Cell<bool>,
}

impl JobObserver for RecordingObserver {
    fn on_phase(&self, message: &str) {
        self.phases.borrow_mut().push(message.to_string());
    }

    fn on_progress(&self, progress: &JobProgress) {
        self.progress.borrow_mut().push(progress.clone());
    }

    fn on_failure(&self, _item: &folio_import::FailedItem) {
        self.failures.set(self.failures.get() + 1);
    }

    fn on_complete(&self, _result: &JobResult) {
        self.completed.set(true);
    }
}
