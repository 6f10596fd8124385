//! Multi-bucket reference model.
//!
//! [`ObjectModel`] owns every tracked bucket. The bucket table is a
//! `DashMap`; each bucket sits behind its own `parking_lot::RwLock`, so
//! mutations of one bucket are serialized while different buckets proceed
//! independently.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::bucket::{BucketModel, DeleteOutcome, NewObject, VersioningStatus};
use super::object::{ObjectRecord, VersionRecord};
use crate::acl::{AclRequest, Owner};
use crate::error::{OracleError, OracleResult};

/// Shared handle to one bucket's model.
pub type BucketHandle = Arc<RwLock<BucketModel>>;

/// The reference model of every bucket a test run touches.
pub struct ObjectModel {
    buckets: DashMap<String, BucketHandle>,
}

impl std::fmt::Debug for ObjectModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectModel")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl Default for ObjectModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Start tracking a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::BucketAlreadyExists`] if the bucket is already
    /// tracked.
    pub fn create_bucket(&self, name: &str, owner: Owner, acl: &AclRequest) -> OracleResult<()> {
        match self.buckets.entry(name.to_owned()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(OracleError::BucketAlreadyExists {
                bucket: name.to_owned(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(RwLock::new(BucketModel::new(name, owner, acl))));
                info!(bucket = %name, "bucket created");
                Ok(())
            }
        }
    }

    /// Stop tracking a bucket and everything in it.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NoSuchBucket`] if the bucket is not tracked.
    pub fn remove_bucket(&self, name: &str) -> OracleResult<()> {
        self.buckets
            .remove(name)
            .ok_or_else(|| OracleError::NoSuchBucket {
                bucket: name.to_owned(),
            })?;
        info!(bucket = %name, "bucket removed");
        Ok(())
    }

    /// Whether the bucket is tracked.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Names of every tracked bucket, sorted.
    #[must_use]
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// A shared handle to a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NoSuchBucket`] if the bucket is not tracked.
    pub fn bucket(&self, name: &str) -> OracleResult<BucketHandle> {
        self.buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| OracleError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// Run `f` with shared access to a bucket.
    pub fn read<R>(&self, name: &str, f: impl FnOnce(&BucketModel) -> R) -> OracleResult<R> {
        let handle = self.bucket(name)?;
        let guard = handle.read();
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access to a bucket.
    pub fn write<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut BucketModel) -> OracleResult<R>,
    ) -> OracleResult<R> {
        let handle = self.bucket(name)?;
        let mut guard = handle.write();
        f(&mut guard)
    }

    /// Forget every bucket.
    pub fn reset(&self) {
        debug!("resetting object model");
        self.buckets.clear();
    }

    // -----------------------------------------------------------------------
    // Store operations
    // -----------------------------------------------------------------------

    /// Record a put. Returns the version ID the object was stored under.
    pub fn put(&self, bucket: &str, object: NewObject) -> OracleResult<String> {
        self.write(bucket, |b| b.put(object))
    }

    /// Record a delete, with or without a version ID.
    pub fn delete(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> OracleResult<DeleteOutcome> {
        self.write(bucket, |b| b.delete(key, version_id))
    }

    /// Record a versioning change.
    pub fn set_versioning(&self, bucket: &str, status: VersioningStatus) -> OracleResult<()> {
        self.write(bucket, |b| b.set_versioning(status))
    }

    /// The bucket's versioning status.
    pub fn versioning(&self, bucket: &str) -> OracleResult<VersioningStatus> {
        self.read(bucket, BucketModel::versioning)
    }

    /// The version history of a key, newest first.
    pub fn versions_of(&self, bucket: &str, key: &str) -> OracleResult<Vec<VersionRecord>> {
        self.read(bucket, |b| b.versions_of(key).to_vec())
    }

    /// Every version in the bucket, by key ascending then newest first.
    pub fn all_entries(&self, bucket: &str) -> OracleResult<Vec<VersionRecord>> {
        self.read(bucket, |b| b.objects().all_entries().cloned().collect())
    }

    /// The latest version of a key, unless that is a delete marker.
    pub fn current(&self, bucket: &str, key: &str) -> OracleResult<Option<ObjectRecord>> {
        self.read(bucket, |b| b.current(key).cloned())
    }
}
