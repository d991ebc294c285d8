//! SQLite persistence layer for the portfolio catalog.
//!
//! Provides schema creation, record CRUD, and the import job log,
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, SeedStats, delete_record, insert_import_job, insert_record, seed_records,
    update_record,
};
pub use queries::{
    count_records, existing_record_ids, get_record, list_import_jobs, list_records,
    record_exists, search_records,
};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory};
