//! Oracle error types.
//!
//! [`OracleError`] separates two kinds of failure:
//!
//! - *Predicted rejections*: requests a conforming S3 service must refuse.
//!   [`OracleError::rejection_code`] returns the S3 error code the service is
//!   expected to answer with, and [`Outcome::predict`] turns them into an
//!   expected error outcome.
//! - *Model-usage errors*: invalid transitions on the reference model itself
//!   (deleting a version that was never recorded, an unknown canned ACL name).
//!   These abort the computation and are never coerced into a prediction.
//!
//! # Usage
//!
//! ```
//! use s3probe_oracle::error::{OracleError, Outcome};
//!
//! let err = OracleError::InvalidVersioningStatus {
//!     status: "Off".to_owned(),
//! };
//! assert_eq!(err.rejection_code(), Some("MalformedXML"));
//!
//! let predicted = Outcome::<()>::predict(Err(err)).unwrap();
//! assert!(predicted.is_rejected());
//! ```

use serde::{Deserialize, Serialize};

/// Oracle error type.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    // -----------------------------------------------------------------------
    // Predicted rejections
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The specified key does not exist, or its latest version is a delete
    /// marker.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The operation is not allowed on the target, e.g. reading the ACL of a
    /// delete marker.
    #[error("Method not allowed: {message}")]
    MethodNotAllowed {
        /// Description of the refused operation.
        message: String,
    },

    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload ID that was not found.
        upload_id: String,
    },

    /// The requested versioning status is not `Enabled` or `Suspended`.
    #[error("Invalid versioning status: {status}")]
    InvalidVersioningStatus {
        /// The requested status.
        status: String,
    },

    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // -----------------------------------------------------------------------
    // Model-usage errors
    // -----------------------------------------------------------------------
    /// The bucket is already tracked by the model.
    #[error("Bucket is already tracked by the model: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name.
        bucket: String,
    },

    /// The specified version was never recorded for the key.
    #[error("The specified version does not exist: key={key}, version_id={version_id}")]
    NoSuchVersion {
        /// The key for the version.
        key: String,
        /// The version ID that was not found.
        version_id: String,
    },

    /// A version ID supplied by the caller is already used by the key.
    #[error("Version ID already recorded: key={key}, version_id={version_id}")]
    DuplicateVersionId {
        /// The key for the version.
        key: String,
        /// The duplicated version ID.
        version_id: String,
    },

    /// The canned ACL name is not one of the predefined values.
    #[error("unknown canned ACL: {0}")]
    UnknownCannedAcl(String),

    // -----------------------------------------------------------------------
    // Internal / catch-all
    // -----------------------------------------------------------------------
    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl OracleError {
    /// The S3 error code a conforming service answers with, if this error is
    /// a predicted rejection. Model-usage errors return `None`.
    #[must_use]
    pub fn rejection_code(&self) -> Option<&'static str> {
        match self {
            Self::NoSuchBucket { .. } => Some("NoSuchBucket"),
            Self::NoSuchKey { .. } => Some("NoSuchKey"),
            Self::MethodNotAllowed { .. } => Some("MethodNotAllowed"),
            Self::NoSuchUpload { .. } => Some("NoSuchUpload"),
            Self::InvalidVersioningStatus { .. } => Some("MalformedXML"),
            Self::InvalidArgument { .. } => Some("InvalidArgument"),
            Self::BucketAlreadyExists { .. }
            | Self::NoSuchVersion { .. }
            | Self::DuplicateVersionId { .. }
            | Self::UnknownCannedAcl(_)
            | Self::Internal(_) => None,
        }
    }

    /// Whether this error is a fatal misuse of the model.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        self.rejection_code().is_none()
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenience result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of a service call, either as predicted by the oracle or as
/// observed from a live service.
///
/// A `Rejected` prediction that matches a `Rejected` observation with the
/// same code is a successful comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "detail")]
pub enum Outcome<T> {
    /// The call succeeds with this value.
    Value(T),
    /// The call fails with this S3 error code.
    Rejected(String),
}

impl<T> Outcome<T> {
    /// Turn a model result into a prediction.
    ///
    /// # Errors
    ///
    /// Propagates model-usage errors, which have no predicted error code.
    pub fn predict(result: OracleResult<T>) -> OracleResult<Self> {
        match result {
            Ok(value) => Ok(Self::Value(value)),
            Err(err) => match err.rejection_code() {
                Some(code) => Ok(Self::Rejected(code.to_owned())),
                None => Err(err),
            },
        }
    }

    /// Whether this outcome is an error outcome.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns the success value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Rejected(code) => Some(code),
        }
    }
}
