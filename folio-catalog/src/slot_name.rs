//! Canonical stored names for media artifacts.
//!
//! Every artifact a record owns is stored as
//! `<record id, zero-padded to 6 digits><slot letter?><original extension>`:
//! `000078.jpg` is the primary slot of record 78, `000078c.png` its third
//! lettered slot. The format is bit-exact; previously stored names are parsed
//! back with [`stored_slot`].

use std::fmt;

/// Width the record id is zero-padded to.
pub const ID_WIDTH: usize = 6;

/// First lettered slot.
pub const FIRST_SUFFIX: char = 'a';

/// Last lettered slot. There is no slot after it.
pub const LAST_SUFFIX: char = 'z';

/// The stored name of one media artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredSlotName {
    pub record_id: u32,
    /// `None` for the primary slot.
    pub suffix: Option<char>,
    /// Extension including its leading dot, exactly as supplied. May be empty.
    pub extension: String,
}

impl StoredSlotName {
    pub fn new(record_id: u32, suffix: Option<char>, extension: impl Into<String>) -> Self {
        Self {
            record_id,
            suffix,
            extension: extension.into(),
        }
    }

    /// Build the stored name for a slot, keeping the source file's extension.
    pub fn for_source(record_id: u32, suffix: Option<char>, source_name: &str) -> Self {
        Self::new(record_id, suffix, split_extension(source_name).1)
    }

    pub fn is_primary(&self) -> bool {
        self.suffix.is_none()
    }
}

impl fmt::Display for StoredSlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", record_prefix(self.record_id))?;
        if let Some(c) = self.suffix {
            write!(f, "{c}")?;
        }
        write!(f, "{}", self.extension)
    }
}

/// The zero-padded id every stored name of a record starts with.
pub fn record_prefix(record_id: u32) -> String {
    format!("{:0width$}", record_id, width = ID_WIDTH)
}

/// Identify the slot a stored filename occupies for a given record.
///
/// Returns `Some(None)` for the primary slot, `Some(Some(c))` for a lettered
/// slot, and `None` when the name does not belong to the record or does not
/// follow the canonical format.
pub fn stored_slot(record_id: u32, stored_name: &str) -> Option<Option<char>> {
    let rest = stored_name.strip_prefix(&record_prefix(record_id))?;
    if rest.is_empty() || rest.starts_with('.') {
        return Some(None);
    }

    let mut chars = rest.chars();
    let letter = chars.next()?;
    let after = chars.as_str();
    if letter.is_ascii_lowercase() && (after.is_empty() || after.starts_with('.')) {
        Some(Some(letter))
    } else {
        None
    }
}

/// The slot letter after `c`, or `None` past [`LAST_SUFFIX`].
pub fn next_suffix_letter(c: char) -> Option<char> {
    if !c.is_ascii_lowercase() || c == LAST_SUFFIX {
        return None;
    }
    char::from_u32(c as u32 + 1)
}

/// Split a filename into stem and extension (extension keeps its dot).
///
/// A leading dot does not start an extension: `.hidden` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}
