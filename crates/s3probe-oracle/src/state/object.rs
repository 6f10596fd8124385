//! Object version records.
//!
//! A key's history is a list of [`VersionRecord`]s, each either a stored
//! object or a delete marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acl::{GrantSet, Owner};
use crate::utils::NULL_VERSION_ID;

// ---------------------------------------------------------------------------
// ObjectRecord
// ---------------------------------------------------------------------------

/// A stored object version (non-delete-marker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    /// The object key.
    pub key: String,
    /// The version ID (`"null"` when written without versioning).
    pub version_id: String,
    /// The object size in bytes.
    pub size: u64,
    /// The time this version was written.
    pub last_modified: DateTime<Utc>,
    /// The owner of this version.
    pub owner: Owner,
    /// The resolved ACL of this version.
    pub acl: GrantSet,
}

// ---------------------------------------------------------------------------
// DeleteMarkerRecord
// ---------------------------------------------------------------------------

/// A delete marker in a versioned bucket.
///
/// A zero-content version that hides every older version of its key from
/// plain object listings while it is the latest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMarkerRecord {
    /// The object key.
    pub key: String,
    /// The version ID of this delete marker.
    pub version_id: String,
    /// The time this delete marker was created.
    pub last_modified: DateTime<Utc>,
    /// The owner of this delete marker.
    pub owner: Owner,
}

// ---------------------------------------------------------------------------
// VersionRecord
// ---------------------------------------------------------------------------

/// One entry of a key's version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum VersionRecord {
    /// A real object version (boxed to reduce enum size).
    Object(Box<ObjectRecord>),
    /// A delete-marker version.
    DeleteMarker(DeleteMarkerRecord),
}

impl VersionRecord {
    /// Returns the object key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Object(obj) => &obj.key,
            Self::DeleteMarker(dm) => &dm.key,
        }
    }

    /// Returns the version ID.
    #[must_use]
    pub fn version_id(&self) -> &str {
        match self {
            Self::Object(obj) => &obj.version_id,
            Self::DeleteMarker(dm) => &dm.version_id,
        }
    }

    /// Whether this entry uses the overwritable `null` version ID.
    #[must_use]
    pub fn is_null_version(&self) -> bool {
        self.version_id() == NULL_VERSION_ID
    }

    /// Returns the last-modified timestamp.
    #[must_use]
    pub fn last_modified(&self) -> DateTime<Utc> {
        match self {
            Self::Object(obj) => obj.last_modified,
            Self::DeleteMarker(dm) => dm.last_modified,
        }
    }

    /// Returns `true` if this version is a delete marker.
    #[must_use]
    pub fn is_delete_marker(&self) -> bool {
        matches!(self, Self::DeleteMarker(_))
    }

    /// Returns the owner of this version.
    #[must_use]
    pub fn owner(&self) -> &Owner {
        match self {
            Self::Object(obj) => &obj.owner,
            Self::DeleteMarker(dm) => &dm.owner,
        }
    }

    /// Returns the size in bytes (zero for delete markers).
    #[must_use]
    pub fn size(&self) -> u64 {
        match self {
            Self::Object(obj) => obj.size,
            Self::DeleteMarker(_) => 0,
        }
    }

    /// Returns a reference to the inner object, if this is an object version.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRecord> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::DeleteMarker(_) => None,
        }
    }

    /// Returns a mutable reference to the inner object, if this is an object version.
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectRecord> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::DeleteMarker(_) => None,
        }
    }
}
