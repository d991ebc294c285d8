//! Read queries for the catalog database.

use std::collections::HashSet;

use folio_catalog::types::*;
use rusqlite::{Connection, params};

use crate::operations::OperationError;

// ── Record Lookups ──────────────────────────────────────────────────────────

/// Check whether a record exists.
pub fn record_exists(conn: &Connection, id: u32) -> Result<bool, OperationError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM records WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Fetch one record by id.
pub fn get_record(conn: &Connection, id: u32) -> Result<Option<Record>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, year, medium, dimensions, description, primary_media,
                created_at, updated_at
         FROM records WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id], row_to_record);
    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List records in id order, optionally limited.
pub fn list_records(conn: &Connection, limit: Option<u32>) -> Result<Vec<Record>, OperationError> {
    let limit = limit.map(i64::from).unwrap_or(-1);
    let mut stmt = conn.prepare(
        "SELECT id, title, year, medium, dimensions, description, primary_media,
                created_at, updated_at
         FROM records ORDER BY id LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Search records by title (case-insensitive LIKE).
pub fn search_records(conn: &Connection, query: &str) -> Result<Vec<Record>, OperationError> {
    let pattern = format!("%{}%", query);
    let mut stmt = conn.prepare(
        "SELECT id, title, year, medium, dimensions, description, primary_media,
                created_at, updated_at
         FROM records WHERE title LIKE ?1 ORDER BY id LIMIT 100",
    )?;
    let rows = stmt.query_map(params![pattern], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Return the subset of `ids` that exist, in one pass.
pub fn existing_record_ids(
    conn: &Connection,
    ids: &[u32],
) -> Result<HashSet<u32>, OperationError> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM records WHERE id = ?1")?;
    let mut found = HashSet::new();
    for &id in ids {
        if stmt.exists(params![id])? {
            found.insert(id);
        }
    }
    Ok(found)
}

/// Number of records in the catalog.
pub fn count_records(conn: &Connection) -> Result<i64, OperationError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
    Ok(count)
}

// ── Import Job Log ──────────────────────────────────────────────────────────

/// List recent import jobs, newest first.
pub fn list_import_jobs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportJob>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(
        "SELECT id, kind, source, started_at, finished_at, succeeded, failed, skipped, dry_run
         FROM import_jobs ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(ImportJob {
            id: row.get(0)?,
            kind: row.get(1)?,
            source: row.get(2)?,
            started_at: row.get(3)?,
            finished_at: row.get(4)?,
            succeeded: row.get(5)?,
            failed: row.get(6)?,
            skipped: row.get(7)?,
            dry_run: row.get(8)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
        medium: row.get(3)?,
        dimensions: row.get(4)?,
        description: row.get(5)?,
        primary_media: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
