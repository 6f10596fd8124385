//! Per-bucket reference model.
//!
//! A [`BucketModel`] tracks one bucket's versioning status, ACL, object
//! version histories and in-progress multipart uploads, and applies every
//! mutation with the semantics a conforming S3 service has:
//!
//! | Versioning | put | delete (no version id) |
//! |---|---|---|
//! | `Disabled` | overwrite the `null` version | remove the key |
//! | `Enabled` | prepend a new version | prepend a delete marker |
//! | `Suspended` | replace the `null` version | replace the `null` version with a `null` delete marker |
//!
//! Deleting with an explicit version ID removes exactly that version in
//! every state, delete markers included.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

use super::keystore::VersionedKeyStore;
use super::multipart::{UploadRecord, UploadTable};
use super::object::{DeleteMarkerRecord, ObjectRecord, VersionRecord};
use crate::acl::{AccessControlList, AclRequest, AclTarget, GrantSet, Owner};
use crate::error::{OracleError, OracleResult};
use crate::utils::{NULL_VERSION_ID, generate_upload_id, generate_version_id};

// ---------------------------------------------------------------------------
// VersioningStatus
// ---------------------------------------------------------------------------

/// Bucket versioning status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning has never been enabled on this bucket (reported as `Off`).
    #[default]
    Disabled,
    /// Versioning is currently enabled.
    Enabled,
    /// Versioning was previously enabled but is now suspended.
    Suspended,
}

impl VersioningStatus {
    /// The status string reported by `GetBucketVersioning`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "Off",
            Self::Enabled => "Enabled",
            Self::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for VersioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersioningStatus {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Off" | "" => Ok(Self::Disabled),
            "Enabled" => Ok(Self::Enabled),
            "Suspended" => Ok(Self::Suspended),
            other => Err(OracleError::InvalidVersioningStatus {
                status: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// An object write (put or multipart completion) applied to the model.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::acl::CannedAcl;
/// use s3probe_oracle::state::NewObject;
///
/// let put = NewObject::builder()
///     .key("photos/cat.jpg")
///     .size(1024)
///     .acl(CannedAcl::PublicRead.into())
///     .build();
/// assert_eq!(put.key, "photos/cat.jpg");
/// assert!(put.version_id.is_none());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewObject {
    /// The object key.
    #[builder(setter(into))]
    pub key: String,
    /// The object size in bytes.
    #[builder(default)]
    pub size: u64,
    /// The writer. Defaults to the bucket owner.
    #[builder(default, setter(strip_option))]
    pub owner: Option<Owner>,
    /// The version ID the service assigned, when mirroring a live write.
    /// Generated when absent and versioning is enabled.
    #[builder(default, setter(strip_option, into))]
    pub version_id: Option<String>,
    /// The ACL sent with the write.
    #[builder(default)]
    pub acl: AclRequest,
}

/// The effect of a delete on the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum DeleteOutcome {
    /// The key was removed entirely (bucket never versioned).
    KeyRemoved {
        /// Whether the key existed before the delete.
        existed: bool,
    },
    /// A delete marker became the latest version.
    MarkerCreated {
        /// The delete marker's version ID.
        version_id: String,
    },
    /// One specific version was permanently removed.
    VersionRemoved {
        /// The removed version ID.
        version_id: String,
        /// Whether the removed version was a delete marker.
        delete_marker: bool,
    },
}

impl DeleteOutcome {
    /// The version ID created or removed, if any.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        match self {
            Self::KeyRemoved { .. } => None,
            Self::MarkerCreated { version_id } | Self::VersionRemoved { version_id, .. } => {
                Some(version_id)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BucketModel
// ---------------------------------------------------------------------------

/// The reference state of one bucket.
#[derive(Debug, Clone)]
pub struct BucketModel {
    name: String,
    owner: Owner,
    versioning: VersioningStatus,
    acl: GrantSet,
    objects: VersionedKeyStore,
    uploads: UploadTable,
}

impl BucketModel {
    /// Create an empty bucket. Bucket-owner canned ACLs are ignored on
    /// buckets and fall back to `private`.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: Owner, acl: &AclRequest) -> Self {
        let grants = acl.resolve(AclTarget::Bucket, &owner.id);
        Self {
            name: name.into(),
            owner,
            versioning: VersioningStatus::Disabled,
            acl: grants,
            objects: VersionedKeyStore::default(),
            uploads: UploadTable::default(),
        }
    }

    /// The bucket name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bucket owner.
    #[must_use]
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// The current versioning status.
    #[must_use]
    pub fn versioning(&self) -> VersioningStatus {
        self.versioning
    }

    /// The object version histories.
    #[must_use]
    pub fn objects(&self) -> &VersionedKeyStore {
        &self.objects
    }

    /// The in-progress multipart uploads.
    #[must_use]
    pub fn uploads(&self) -> &UploadTable {
        &self.uploads
    }

    /// Whether the bucket holds no versions and no uploads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.uploads.is_empty()
    }

    // -----------------------------------------------------------------------
    // Versioning
    // -----------------------------------------------------------------------

    /// Apply a `PutBucketVersioning` request.
    ///
    /// Only `Enabled` and `Suspended` are accepted; a request for
    /// `Disabled` (`Off`) is rejected with `MalformedXML`. Existing history,
    /// including pre-versioning `null` versions, is kept across transitions.
    pub fn set_versioning(&mut self, status: VersioningStatus) -> OracleResult<()> {
        if status == VersioningStatus::Disabled {
            return Err(OracleError::InvalidVersioningStatus {
                status: status.as_str().to_owned(),
            });
        }
        if self.versioning != status {
            debug!(bucket = %self.name, from = %self.versioning, to = %status, "versioning transition");
            self.versioning = status;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    /// Write an object version. Returns the version ID it was stored under.
    pub fn put(&mut self, object: NewObject) -> OracleResult<String> {
        let owner = object.owner.unwrap_or_else(|| self.owner.clone());
        let acl = object.acl.resolve(
            AclTarget::NewObject {
                bucket_owner: &self.owner.id,
            },
            &owner.id,
        );
        let version_id = self.next_version_id(&object.key, object.version_id)?;
        let record = VersionRecord::Object(Box::new(ObjectRecord {
            key: object.key,
            version_id: version_id.clone(),
            size: object.size,
            last_modified: Utc::now(),
            owner,
            acl,
        }));
        debug!(bucket = %self.name, key = %record.key(), version_id = %version_id, "put object");
        self.store(record);
        Ok(version_id)
    }

    /// Apply `DeleteObject`, with or without a version ID.
    pub fn delete(&mut self, key: &str, version_id: Option<&str>) -> OracleResult<DeleteOutcome> {
        match version_id {
            Some(version_id) => self.delete_version(key, version_id),
            None => self.delete_current(key, None),
        }
    }

    /// Delete without a version ID. `marker_id` mirrors the delete marker ID
    /// a live service assigned; it is generated when absent.
    pub fn delete_current(
        &mut self,
        key: &str,
        marker_id: Option<String>,
    ) -> OracleResult<DeleteOutcome> {
        if self.versioning == VersioningStatus::Disabled {
            let existed = self.objects.remove_key(key).is_some();
            debug!(bucket = %self.name, key = %key, existed, "delete key");
            return Ok(DeleteOutcome::KeyRemoved { existed });
        }

        let version_id = self.next_version_id(key, marker_id)?;
        let marker = VersionRecord::DeleteMarker(DeleteMarkerRecord {
            key: key.to_owned(),
            version_id: version_id.clone(),
            last_modified: Utc::now(),
            owner: self.owner.clone(),
        });
        debug!(bucket = %self.name, key = %key, version_id = %version_id, "insert delete marker");
        self.store(marker);
        Ok(DeleteOutcome::MarkerCreated { version_id })
    }

    /// Permanently remove one version, which may be a delete marker.
    ///
    /// Removing a version the model never recorded is a usage error.
    pub fn delete_version(&mut self, key: &str, version_id: &str) -> OracleResult<DeleteOutcome> {
        let removed = self
            .objects
            .remove_version(key, version_id)
            .ok_or_else(|| OracleError::NoSuchVersion {
                key: key.to_owned(),
                version_id: version_id.to_owned(),
            })?;
        debug!(bucket = %self.name, key = %key, version_id = %version_id, "delete version");
        Ok(DeleteOutcome::VersionRemoved {
            version_id: version_id.to_owned(),
            delete_marker: removed.is_delete_marker(),
        })
    }

    /// The version history of a key, newest first.
    #[must_use]
    pub fn versions_of(&self, key: &str) -> &[VersionRecord] {
        self.objects.versions_of(key)
    }

    /// The latest version of a key, unless that is a delete marker.
    #[must_use]
    pub fn current(&self, key: &str) -> Option<&ObjectRecord> {
        self.objects.latest(key).and_then(VersionRecord::as_object)
    }

    /// The ID a new version of `key` is stored under.
    fn next_version_id(&self, key: &str, assigned: Option<String>) -> OracleResult<String> {
        if self.versioning != VersioningStatus::Enabled {
            return Ok(NULL_VERSION_ID.to_owned());
        }
        let version_id = assigned.unwrap_or_else(generate_version_id);
        if self.objects.contains_version(key, &version_id) {
            return Err(OracleError::DuplicateVersionId {
                key: key.to_owned(),
                version_id,
            });
        }
        Ok(version_id)
    }

    fn store(&mut self, record: VersionRecord) {
        if record.is_null_version() {
            if let Some(old) = self.objects.replace_null(record) {
                debug!(bucket = %self.name, key = %old.key(), "replaced null version");
            }
        } else {
            self.objects.push(record);
        }
    }

    // -----------------------------------------------------------------------
    // ACLs
    // -----------------------------------------------------------------------

    /// The bucket ACL.
    #[must_use]
    pub fn acl(&self) -> AccessControlList {
        AccessControlList {
            owner: self.owner.clone(),
            grants: self.acl.clone(),
        }
    }

    /// Apply `PutBucketAcl`.
    pub fn set_acl(&mut self, acl: &AclRequest) {
        self.acl = acl.resolve(AclTarget::Bucket, &self.owner.id);
        debug!(bucket = %self.name, grants = %self.acl, "set bucket acl");
    }

    /// The ACL of an object version (the latest when `version_id` is `None`).
    pub fn object_acl(&self, key: &str, version_id: Option<&str>) -> OracleResult<AccessControlList> {
        let object = self.object_version(key, version_id)?;
        Ok(AccessControlList {
            owner: object.owner.clone(),
            grants: object.acl.clone(),
        })
    }

    /// Apply `PutObjectAcl` to an object version (the latest when
    /// `version_id` is `None`).
    pub fn set_object_acl(
        &mut self,
        key: &str,
        version_id: Option<&str>,
        acl: &AclRequest,
    ) -> OracleResult<()> {
        let (owner_id, version_id) = {
            let object = self.object_version(key, version_id)?;
            (object.owner.id.clone(), object.version_id.clone())
        };
        let grants = acl.resolve(
            AclTarget::Object {
                bucket_owner: &self.owner.id,
            },
            &owner_id,
        );
        debug!(bucket = %self.name, key = %key, version_id = %version_id, grants = %grants, "set object acl");
        if let Some(object) = self
            .objects
            .version_mut(key, &version_id)
            .and_then(VersionRecord::as_object_mut)
        {
            object.acl = grants;
        }
        Ok(())
    }

    fn object_version(&self, key: &str, version_id: Option<&str>) -> OracleResult<&ObjectRecord> {
        let version = match version_id {
            None => self.objects.latest(key).ok_or_else(|| OracleError::NoSuchKey {
                key: key.to_owned(),
            })?,
            Some(version_id) => self
                .objects
                .versions_of(key)
                .iter()
                .find(|v| v.version_id() == version_id)
                .ok_or_else(|| OracleError::NoSuchVersion {
                    key: key.to_owned(),
                    version_id: version_id.to_owned(),
                })?,
        };
        match (version.as_object(), version_id) {
            (Some(object), _) => Ok(object),
            (None, None) => Err(OracleError::NoSuchKey {
                key: key.to_owned(),
            }),
            (None, Some(_)) => Err(OracleError::MethodNotAllowed {
                message: format!("{key} version {} is a delete marker", version.version_id()),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Multipart uploads
    // -----------------------------------------------------------------------

    /// Apply `CreateMultipartUpload`. Returns the upload ID, which is
    /// `upload_id` when mirroring a live service and generated otherwise.
    pub fn initiate_upload(
        &mut self,
        key: &str,
        upload_id: Option<String>,
        owner: Option<Owner>,
        acl: &AclRequest,
    ) -> String {
        let owner = owner.unwrap_or_else(|| self.owner.clone());
        let grants = acl.resolve(
            AclTarget::NewObject {
                bucket_owner: &self.owner.id,
            },
            &owner.id,
        );
        let upload_id = upload_id.unwrap_or_else(generate_upload_id);
        debug!(bucket = %self.name, key = %key, upload_id = %upload_id, "initiate upload");
        self.uploads.insert(UploadRecord {
            key: key.to_owned(),
            upload_id: upload_id.clone(),
            initiated: Utc::now(),
            owner,
            acl: grants,
        });
        upload_id
    }

    /// Apply `CompleteMultipartUpload`: store the assembled object like a put
    /// and forget the upload. Returns the new version ID.
    pub fn complete_upload(
        &mut self,
        key: &str,
        upload_id: &str,
        size: u64,
        version_id: Option<String>,
    ) -> OracleResult<String> {
        let upload = self
            .uploads
            .get(key, upload_id)
            .cloned()
            .ok_or_else(|| OracleError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })?;
        let version_id = self.next_version_id(key, version_id)?;
        self.uploads.remove(key, upload_id);
        debug!(bucket = %self.name, key = %key, upload_id = %upload_id, version_id = %version_id, "complete upload");
        self.store(VersionRecord::Object(Box::new(ObjectRecord {
            key: upload.key,
            version_id: version_id.clone(),
            size,
            last_modified: Utc::now(),
            owner: upload.owner,
            acl: upload.acl,
        })));
        Ok(version_id)
    }

    /// Apply `AbortMultipartUpload`.
    pub fn abort_upload(&mut self, key: &str, upload_id: &str) -> OracleResult<()> {
        self.uploads
            .remove(key, upload_id)
            .ok_or_else(|| OracleError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })?;
        debug!(bucket = %self.name, key = %key, upload_id = %upload_id, "abort upload");
        Ok(())
    }
}
