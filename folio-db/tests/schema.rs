use folio_db::schema::{CURRENT_VERSION, create_schema, get_schema_version, migrate};
use folio_db::{open_database, open_memory};
use rusqlite::Connection;
use tempfile::TempDir;

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    // Creating again should not error
    create_schema(&conn).unwrap();
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    for table in ["schema_version", "records", "import_jobs"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn migrate_from_version_one_adds_job_log() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE schema_version (version INTEGER NOT NULL, applied_at TEXT NOT NULL DEFAULT (datetime('now')));
         INSERT INTO schema_version (version) VALUES (1);
         CREATE TABLE records (id INTEGER PRIMARY KEY, title TEXT NOT NULL, year INTEGER, medium TEXT,
             dimensions TEXT, description TEXT, primary_media TEXT,
             created_at TEXT NOT NULL DEFAULT (datetime('now')),
             updated_at TEXT NOT NULL DEFAULT (datetime('now')));",
    )
    .unwrap();

    migrate(&conn, 1).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM import_jobs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn open_database_creates_parent_dirs() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("catalog.db");
    let conn = open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    assert!(path.exists());

    // Reopening an up-to-date database is a no-op
    drop(conn);
    let conn = open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}
