//! In-progress multipart uploads.
//!
//! Uploads are keyed by `(key, upload_id)`. Listing order is key ascending,
//! then upload ID ascending within a key, independent of initiation time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acl::{GrantSet, Owner};

/// An in-progress multipart upload.
///
/// The ACL is resolved at initiation and applied to the object version the
/// upload creates when it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// The object key that this upload will create.
    pub key: String,
    /// Unique identifier for this upload.
    pub upload_id: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// The owner who initiated the upload.
    pub owner: Owner,
    /// The ACL the completed object receives.
    pub acl: GrantSet,
}

/// The uploads of one bucket.
#[derive(Debug, Default, Clone)]
pub struct UploadTable {
    uploads: BTreeMap<(String, String), UploadRecord>,
}

impl UploadTable {
    /// Track a new upload. Returns the previous record with the same
    /// `(key, upload_id)`, if any.
    pub fn insert(&mut self, upload: UploadRecord) -> Option<UploadRecord> {
        self.uploads
            .insert((upload.key.clone(), upload.upload_id.clone()), upload)
    }

    /// Stop tracking an upload.
    pub fn remove(&mut self, key: &str, upload_id: &str) -> Option<UploadRecord> {
        self.uploads.remove(&(key.to_owned(), upload_id.to_owned()))
    }

    /// Look up an upload.
    #[must_use]
    pub fn get(&self, key: &str, upload_id: &str) -> Option<&UploadRecord> {
        self.uploads.get(&(key.to_owned(), upload_id.to_owned()))
    }

    /// Uploads in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadRecord> {
        self.uploads.values()
    }

    /// Number of in-progress uploads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    /// Whether there are no in-progress uploads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }
}
