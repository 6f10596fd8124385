//! The service surface the conformance driver talks to.
//!
//! [`S3Backend`] is the narrow slice of the S3 API the oracle is fed from
//! and checked against. A request the service refuses with an S3 error code
//! surfaces as a [`Rejection`] inside the returned `anyhow::Error`; anything
//! else is a collaborator failure.

use async_trait::async_trait;
use s3probe_oracle::acl::{AccessControlList, AclRequest};
use s3probe_oracle::ops::{ListRequest, Listing};
use s3probe_oracle::state::VersioningStatus;
use s3probe_oracle::{OracleError, Outcome};

/// A request the service answered with an S3 error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("service rejected the request with {code}")]
pub struct Rejection {
    /// The S3 error code, e.g. `NoSuchUpload`.
    pub code: String,
}

impl Rejection {
    /// A rejection with the given error code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Convert an oracle error raised while serving a request: predicted
/// rejections become [`Rejection`]s, usage errors stay fatal.
#[must_use]
pub fn service_error(err: OracleError) -> anyhow::Error {
    match err.rejection_code() {
        Some(code) => Rejection::new(code).into(),
        None => err.into(),
    }
}

/// Turn a backend result into an observed [`Outcome`]. Rejections are
/// observations; every other error propagates.
pub fn observe<T>(result: anyhow::Result<T>) -> anyhow::Result<Outcome<T>> {
    match result {
        Ok(value) => Ok(Outcome::Value(value)),
        Err(err) => match err.downcast::<Rejection>() {
            Ok(rejection) => Ok(Outcome::Rejected(rejection.code)),
            Err(err) => Err(err),
        },
    }
}

/// What a `DeleteObject` without a version ID did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteResult {
    /// Version ID of the delete marker, when one was created.
    pub version_id: Option<String>,
    /// Whether a delete marker was created.
    pub delete_marker: bool,
}

/// The S3 operations the oracle consumes.
#[async_trait]
pub trait S3Backend: Send + Sync {
    /// Short name used in test output.
    fn name(&self) -> &'static str;

    /// `CreateBucket` with a bucket ACL.
    async fn create_bucket(&self, bucket: &str, acl: &AclRequest) -> anyhow::Result<()>;

    /// Delete every version and upload in the bucket, then the bucket.
    async fn remove_bucket(&self, bucket: &str) -> anyhow::Result<()>;

    /// `PutObject` with `size` bytes of content. Returns the version ID the
    /// service reports, if any.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        size: u64,
        acl: &AclRequest,
    ) -> anyhow::Result<Option<String>>;

    /// `DeleteObject` without a version ID.
    async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<DeleteResult>;

    /// `DeleteObject` of one version.
    async fn delete_version(&self, bucket: &str, key: &str, version_id: &str)
    -> anyhow::Result<()>;

    /// Any listing call.
    async fn list(&self, bucket: &str, request: &ListRequest) -> anyhow::Result<Listing>;

    /// `GetBucketAcl` (`key` is `None`) or `GetObjectAcl`.
    async fn get_acl(
        &self,
        bucket: &str,
        key: Option<&str>,
        version_id: Option<&str>,
    ) -> anyhow::Result<AccessControlList>;

    /// `PutBucketAcl` (`key` is `None`) or `PutObjectAcl`.
    async fn set_acl(
        &self,
        bucket: &str,
        key: Option<&str>,
        version_id: Option<&str>,
        acl: &AclRequest,
    ) -> anyhow::Result<()>;

    /// `GetBucketVersioning`.
    async fn get_versioning(&self, bucket: &str) -> anyhow::Result<VersioningStatus>;

    /// `PutBucketVersioning`.
    async fn set_versioning(&self, bucket: &str, status: VersioningStatus) -> anyhow::Result<()>;

    /// Wait until the bucket reports `status`. Services that apply
    /// versioning changes synchronously need not override this.
    async fn await_versioning(&self, bucket: &str, status: VersioningStatus) -> anyhow::Result<()> {
        let _ = (bucket, status);
        Ok(())
    }

    /// `CreateMultipartUpload`. Returns the upload ID.
    async fn create_upload(&self, bucket: &str, key: &str, acl: &AclRequest)
    -> anyhow::Result<String>;

    /// Upload one part of `size` bytes and complete the upload. Returns the
    /// version ID the service reports, if any.
    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        size: u64,
    ) -> anyhow::Result<Option<String>>;

    /// `AbortMultipartUpload`.
    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_observe_rejection_as_outcome() {
        let result: anyhow::Result<()> = Err(Rejection::new("NoSuchUpload").into());
        let outcome = observe(result).expect("rejection is an observation");
        assert_eq!(outcome.code(), Some("NoSuchUpload"));
    }

    #[test]
    fn test_should_propagate_other_errors() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset"));
        assert!(observe(result).is_err());
    }

    #[test]
    fn test_should_keep_usage_errors_fatal() {
        let err = service_error(OracleError::DuplicateVersionId {
            key: "k".to_owned(),
            version_id: "v".to_owned(),
        });
        assert!(err.downcast_ref::<Rejection>().is_none());

        let err = service_error(OracleError::NoSuchUpload {
            upload_id: "u".to_owned(),
        });
        assert_eq!(
            err.downcast_ref::<Rejection>().map(|r| r.code.as_str()),
            Some("NoSuchUpload")
        );
    }
}
