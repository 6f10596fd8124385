//! Listing entries.
//!
//! Every listing walks a sequence ordered by key, and for version and upload
//! listings by a secondary ID within the key. [`ListEntry`] exposes that pair
//! to the aggregator and the paginator.

use serde::{Deserialize, Serialize};

use crate::state::{UploadRecord, VersionRecord};

/// An entry of an ordered listing.
pub trait ListEntry {
    /// The object key the entry belongs to.
    fn key(&self) -> &str;

    /// The version ID or upload ID that orders entries within a key.
    fn secondary_id(&self) -> Option<&str> {
        None
    }
}

/// An object in a `ListObjects` / `ListObjectsV2` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    /// The object key.
    pub key: String,
    /// The object size in bytes.
    pub size: u64,
}

impl ListEntry for ObjectSummary {
    fn key(&self) -> &str {
        &self.key
    }
}

/// A version or delete marker in a `ListObjectVersions` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    /// The object key.
    pub key: String,
    /// The version ID.
    pub version_id: String,
    /// Whether this is the latest version of its key.
    pub is_latest: bool,
    /// Whether this version is a delete marker.
    pub is_delete_marker: bool,
    /// The size in bytes (zero for delete markers).
    pub size: u64,
}

impl VersionSummary {
    /// Summarize a stored version. `is_latest` is the caller's knowledge of
    /// its position in the key's history.
    #[must_use]
    pub fn from_record(record: &VersionRecord, is_latest: bool) -> Self {
        Self {
            key: record.key().to_owned(),
            version_id: record.version_id().to_owned(),
            is_latest,
            is_delete_marker: record.is_delete_marker(),
            size: record.size(),
        }
    }
}

impl ListEntry for VersionSummary {
    fn key(&self) -> &str {
        &self.key
    }

    fn secondary_id(&self) -> Option<&str> {
        Some(&self.version_id)
    }
}

/// An in-progress upload in a `ListMultipartUploads` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    /// The object key.
    pub key: String,
    /// The upload ID.
    pub upload_id: String,
}

impl From<&UploadRecord> for UploadSummary {
    fn from(upload: &UploadRecord) -> Self {
        Self {
            key: upload.key.clone(),
            upload_id: upload.upload_id.clone(),
        }
    }
}

impl ListEntry for UploadSummary {
    fn key(&self) -> &str {
        &self.key
    }

    fn secondary_id(&self) -> Option<&str> {
        Some(&self.upload_id)
    }
}
