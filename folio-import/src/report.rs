//! The result report shared by file and CSV imports.

use serde::{Deserialize, Serialize};

/// One item that was stored or applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessItem {
    pub record_id: u32,
    /// Source file name, or the row label for CSV imports.
    pub filename: String,
    /// Name the file was stored under (file imports only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_name: Option<String>,
}

/// One item whose operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedItem {
    pub record_id: Option<u32>,
    pub filename: String,
    pub reason: String,
}

/// One item the plan chose not to touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItem {
    pub record_id: Option<u32>,
    pub filename: Option<String>,
    pub reason: String,
}

/// Accumulated outcome of a job. Items are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub success: Vec<SuccessItem>,
    pub failed: Vec<FailedItem>,
    pub skipped: Vec<SkippedItem>,
}

impl JobResult {
    pub fn push_success(
        &mut self,
        record_id: u32,
        filename: impl Into<String>,
        stored_name: Option<String>,
    ) {
        self.success.push(SuccessItem {
            record_id,
            filename: filename.into(),
            stored_name,
        });
    }

    pub fn push_failed(
        &mut self,
        record_id: Option<u32>,
        filename: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.failed.push(FailedItem {
            record_id,
            filename: filename.into(),
            reason: reason.into(),
        });
    }

    pub fn push_skipped(
        &mut self,
        record_id: Option<u32>,
        filename: Option<String>,
        reason: impl Into<String>,
    ) {
        self.skipped.push(SkippedItem {
            record_id,
            filename,
            reason: reason.into(),
        });
    }

    /// Append another result's items after this one's.
    pub fn extend(&mut self, other: JobResult) {
        self.success.extend(other.success);
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
    }

    pub fn total(&self) -> usize {
        self.success.len() + self.failed.len() + self.skipped.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut result = JobResult::default();
        result.push_success(78, "078.jpg", Some("000078.jpg".into()));
        result.push_failed(Some(3), "3 x.jpg", "record 3 not found");
        result.push_skipped(None, Some("cover.jpg".into()), "unrecognized name");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"][0]["recordId"], 78);
        assert_eq!(json["success"][0]["storedName"], "000078.jpg");
        assert_eq!(json["failed"][0]["reason"], "record 3 not found");
        assert!(json["skipped"][0]["recordId"].is_null());
        assert_eq!(result.total(), 3);
    }
}
