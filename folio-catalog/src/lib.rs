//! Portfolio catalog data model, filename identity parsing, and seed YAML.
//!
//! This crate defines the catalog's data model without any database
//! dependencies. The bulk import engine (`folio-import`) and the SQLite store
//! (`folio-db`) both build on these types.

pub mod name_parser;
pub mod slot_name;
pub mod types;
pub mod yaml;

pub use name_parser::{GrammarRule, ParsedEntry, parse_filename, parse_record_id};
pub use slot_name::{StoredSlotName, record_prefix, split_extension, stored_slot};
pub use types::*;
pub use yaml::{YamlError, load_records};
