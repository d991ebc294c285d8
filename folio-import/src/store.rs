//! Collaborator interfaces the engine reads and mutates, plus the concrete
//! adapters the workspace ships (SQLite records, directory-backed media).

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use folio_catalog::RecordFields;
use folio_db::{Connection, OperationError};
use folio_lib::MediaDir;
use thiserror::Error;

/// Errors surfaced by a record or blob store. Their messages end up verbatim
/// in failure reports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    Conflict(u32),
    #[error("record {0} not found")]
    NotFound(u32),
    #[error("store error: {0}")]
    Backend(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Persistence for catalog records, addressed by numeric id.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn exists_record(&self, id: u32) -> Result<bool, StoreError>;

    /// Create a record under `id`. Fails with [`StoreError::Conflict`] if the
    /// id is taken.
    async fn create_record(&self, id: u32, fields: &RecordFields) -> Result<u32, StoreError>;

    /// Overwrite the fields that are set in `fields`.
    async fn update_record(&self, id: u32, fields: &RecordFields) -> Result<(), StoreError>;

    /// The subset of `ids` that exist. Stores with a bulk lookup should
    /// override this.
    async fn existing_ids(&self, ids: &[u32]) -> Result<HashSet<u32>, StoreError> {
        let mut found = HashSet::new();
        for &id in ids {
            if self.exists_record(id).await? {
                found.insert(id);
            }
        }
        Ok(found)
    }
}

/// Raw media storage addressed by `(record id, file name)`.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn list_stored_names(&self, record_id: u32) -> Result<Vec<String>, StoreError>;

    async fn write_blob(&self, record_id: u32, filename: &str, bytes: &[u8])
    -> Result<(), StoreError>;
}

// ── SQLite Records ──────────────────────────────────────────────────────────

/// [`RecordStore`] over a catalog database connection.
///
/// SQLite calls are synchronous and short; the lock is never held across an
/// await point.
pub struct SqliteRecords {
    conn: Mutex<Connection>,
}

impl SqliteRecords {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run `f` with the underlying connection (job logging, queries).
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> Result<T, StoreError> {
        let conn = self.lock()?;
        Ok(f(&conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::backend("database lock poisoned"))
    }
}

fn map_operation_error(id: u32, err: OperationError) -> StoreError {
    if err.is_constraint_violation() {
        return StoreError::Conflict(id);
    }
    match err {
        OperationError::NotFound { .. } => StoreError::NotFound(id),
        other => StoreError::Backend(other.to_string()),
    }
}

impl RecordStore for SqliteRecords {
    async fn exists_record(&self, id: u32) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        folio_db::record_exists(&conn, id).map_err(|e| map_operation_error(id, e))
    }

    async fn create_record(&self, id: u32, fields: &RecordFields) -> Result<u32, StoreError> {
        let conn = self.lock()?;
        folio_db::insert_record(&conn, id, fields).map_err(|e| map_operation_error(id, e))
    }

    async fn update_record(&self, id: u32, fields: &RecordFields) -> Result<(), StoreError> {
        let conn = self.lock()?;
        folio_db::update_record(&conn, id, fields).map_err(|e| map_operation_error(id, e))
    }

    async fn existing_ids(&self, ids: &[u32]) -> Result<HashSet<u32>, StoreError> {
        let conn = self.lock()?;
        folio_db::existing_record_ids(&conn, ids)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

// ── Media Directory ─────────────────────────────────────────────────────────

impl BlobStore for MediaDir {
    async fn list_stored_names(&self, record_id: u32) -> Result<Vec<String>, StoreError> {
        Ok(self.list_names(record_id).await?)
    }

    async fn write_blob(
        &self,
        record_id: u32,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        self.write(record_id, filename, bytes).await?;
        Ok(())
    }
}
