//! Storage slot allocation.
//!
//! A record has one primary slot and up to 26 lettered slots (`a`..`z`).
//! New lettered media always goes after the highest letter in use; gaps left
//! by deleted files are never reused.

use folio_catalog::slot_name::{FIRST_SUFFIX, next_suffix_letter, stored_slot};
use thiserror::Error;

use crate::store::{BlobStore, StoreError};

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("record {record_id} has no free media slots (a-z all used)")]
    SlotsExhausted { record_id: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The next lettered slot for a record, given the names already stored.
///
/// Names that do not belong to `record_id` or are not in canonical form are
/// ignored.
pub fn next_suffix<S: AsRef<str>>(record_id: u32, stored_names: &[S]) -> Result<char, SlotError> {
    let last = stored_names
        .iter()
        .filter_map(|name| stored_slot(record_id, name.as_ref()).flatten())
        .max();

    match last {
        None => Ok(FIRST_SUFFIX),
        Some(c) => next_suffix_letter(c).ok_or(SlotError::SlotsExhausted { record_id }),
    }
}

/// Pick the slot for one upload.
///
/// The primary slot is returned without consulting the store (it is replaced
/// in place). Otherwise the record's current listing decides.
pub async fn allocate_slot<B: BlobStore + ?Sized>(
    blobs: &B,
    record_id: u32,
    primary_requested: bool,
) -> Result<Option<char>, SlotError> {
    if primary_requested {
        return Ok(None);
    }
    let names = blobs.list_stored_names(record_id).await?;
    let suffix = next_suffix(record_id, &names)?;
    log::debug!("Allocated slot '{}' for record {}", suffix, record_id);
    Ok(Some(suffix))
}
