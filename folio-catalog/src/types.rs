//! Data model types for the portfolio catalog.
//!
//! These types represent the persistent catalog schema: records (one per
//! artwork), the editable field set shared by imports and seeds, and the
//! import job log.

use serde::{Deserialize, Serialize};

// ── Record ──────────────────────────────────────────────────────────────────

/// One catalog entry (an artwork), identified by a small positive integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Stored name of the primary media artifact (e.g., "000078.jpg").
    #[serde(default)]
    pub primary_media: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A partial set of record fields.
///
/// Used for both creation and update. On update, `None` means "leave the
/// stored value alone", so a CSV row with an empty `medium` cell never wipes
/// an existing medium.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub primary_media: Option<String>,
}

impl RecordFields {
    /// Fields carrying only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Fields carrying only the primary media name.
    pub fn with_primary_media(name: impl Into<String>) -> Self {
        Self {
            primary_media: Some(name.into()),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.medium.is_none()
            && self.dimensions.is_none()
            && self.description.is_none()
            && self.primary_media.is_none()
    }
}

/// Fallback title for a record created without any title hint.
pub fn default_record_title(id: u32) -> String {
    format!("Record {id}")
}

/// A record definition loaded from seed YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub id: u32,
    #[serde(flatten)]
    pub fields: RecordFields,
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Which entry point ran an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Files,
    Csv,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Files => "files",
            ImportKind::Csv => "csv",
        }
    }
}

/// One row of the import job log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: i64,
    pub kind: String,
    pub source: String,
    pub started_at: String,
    pub finished_at: String,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub dry_run: bool,
}
