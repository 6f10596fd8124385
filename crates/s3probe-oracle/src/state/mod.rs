//! Reference model state.
//!
//! - [`ObjectModel`] -- every tracked bucket
//! - [`BucketModel`] -- per-bucket versioning, ACL, versions and uploads
//! - [`VersionedKeyStore`] -- ordered key -> version history storage
//! - [`VersionRecord`] / [`ObjectRecord`] / [`DeleteMarkerRecord`] -- version entries
//! - [`UploadTable`] / [`UploadRecord`] -- in-progress multipart uploads
//!
//! # Thread Safety
//!
//! `ObjectModel` is `Send + Sync`: the bucket table is a `DashMap` and each
//! bucket is guarded by a `parking_lot::RwLock`.

pub(crate) mod bucket;
pub(crate) mod keystore;
pub(crate) mod multipart;
pub(crate) mod object;
pub(crate) mod service;

pub use bucket::{BucketModel, DeleteOutcome, NewObject, VersioningStatus};
pub use keystore::VersionedKeyStore;
pub use multipart::{UploadRecord, UploadTable};
pub use object::{DeleteMarkerRecord, ObjectRecord, VersionRecord};
pub use service::{BucketHandle, ObjectModel};
