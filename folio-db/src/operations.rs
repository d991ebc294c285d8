//! Write operations for records and the import job log.

use folio_catalog::types::*;
use rusqlite::{Connection, ErrorCode, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

impl OperationError {
    /// True when the underlying SQLite error is a constraint violation
    /// (duplicate primary key, failed CHECK).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            OperationError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }

    fn record_not_found(id: u32) -> Self {
        OperationError::NotFound {
            entity_type: "record".to_string(),
            id: id.to_string(),
        }
    }
}

// ── Record Operations ───────────────────────────────────────────────────────

/// Insert a new record with an explicit id.
///
/// Fails with a constraint violation if the id is taken. A record needs a
/// title; `fields.title` falls back to "Record {id}".
pub fn insert_record(
    conn: &Connection,
    id: u32,
    fields: &RecordFields,
) -> Result<u32, OperationError> {
    let title = fields
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| default_record_title(id));
    conn.execute(
        "INSERT INTO records (id, title, year, medium, dimensions, description, primary_media)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            title,
            fields.year,
            fields.medium,
            fields.dimensions,
            fields.description,
            fields.primary_media,
        ],
    )?;
    Ok(id)
}

/// Update the fields that are set; leave the rest untouched.
pub fn update_record(
    conn: &Connection,
    id: u32,
    fields: &RecordFields,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE records SET
             title = COALESCE(?2, title),
             year = COALESCE(?3, year),
             medium = COALESCE(?4, medium),
             dimensions = COALESCE(?5, dimensions),
             description = COALESCE(?6, description),
             primary_media = COALESCE(?7, primary_media),
             updated_at = datetime('now')
         WHERE id = ?1",
        params![
            id,
            fields.title,
            fields.year,
            fields.medium,
            fields.dimensions,
            fields.description,
            fields.primary_media,
        ],
    )?;
    if changed == 0 {
        return Err(OperationError::record_not_found(id));
    }
    Ok(())
}

/// Delete a record. Returns `NotFound` if it did not exist.
pub fn delete_record(conn: &Connection, id: u32) -> Result<(), OperationError> {
    let changed = conn.execute("DELETE FROM records WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(OperationError::record_not_found(id));
    }
    Ok(())
}

/// Statistics from seeding records out of YAML.
#[derive(Debug, Default)]
pub struct SeedStats {
    pub created: usize,
    pub updated: usize,
}

/// Insert or update seed records inside one transaction.
///
/// Existing records only receive the fields the seed sets.
pub fn seed_records(conn: &Connection, records: &[SeedRecord]) -> Result<SeedStats, OperationError> {
    let mut stats = SeedStats::default();
    let tx = conn.unchecked_transaction()?;

    for record in records {
        if crate::queries::record_exists(&tx, record.id)? {
            update_record(&tx, record.id, &record.fields)?;
            stats.updated += 1;
        } else {
            insert_record(&tx, record.id, &record.fields)?;
            stats.created += 1;
        }
    }

    tx.commit()?;
    Ok(stats)
}

// ── Import Job Log ──────────────────────────────────────────────────────────

/// Append an import job to the log. Returns the new row id.
pub fn insert_import_job(conn: &Connection, job: &ImportJob) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_jobs (kind, source, started_at, finished_at,
             succeeded, failed, skipped, dry_run)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            job.kind,
            job.source,
            job.started_at,
            job.finished_at,
            job.succeeded,
            job.failed,
            job.skipped,
            job.dry_run,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
