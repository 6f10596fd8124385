//! The oracle facade.
//!
//! [`Oracle`] bundles the configuration and the reference model and exposes
//! the three calls a conformance driver needs: [`Oracle::predict_listing`],
//! [`Oracle::predict_acl`] and [`Oracle::verify`].
//!
//! # Examples
//!
//! ```
//! use s3probe_oracle::acl::{AclRequest, CannedAcl};
//! use s3probe_oracle::ops::{ListObjectsRequest, Listing};
//! use s3probe_oracle::state::NewObject;
//! use s3probe_oracle::{Oracle, OracleConfig};
//!
//! let oracle = Oracle::new(OracleConfig::default());
//! oracle.create_bucket("b", &CannedAcl::PublicReadWrite.into()).unwrap();
//! oracle.model().put("b", NewObject::builder().key("k").build()).unwrap();
//!
//! let listing = oracle
//!     .predict_listing("b", &ListObjectsRequest::default().into())
//!     .unwrap();
//! assert!(matches!(listing, Listing::Objects(page) if page.entries.len() == 1));
//!
//! let acl = oracle.predict_acl("b", None, None).unwrap();
//! assert_eq!(acl.grants.len(), 3);
//! assert!(oracle.verify("bucket acl", &acl, &acl.clone()).is_clean());
//! ```

use crate::acl::{AccessControlList, AclRequest};
use crate::config::OracleConfig;
use crate::error::OracleResult;
use crate::ops::{self, ListRequest, Listing};
use crate::state::{ObjectModel, VersioningStatus};
use crate::verify::{Diff, VerificationReport};

/// Predicts listing and ACL responses and verifies observed ones.
#[derive(Debug, Default)]
pub struct Oracle {
    config: OracleConfig,
    model: ObjectModel,
}

impl Oracle {
    /// Create an oracle with an empty model.
    #[must_use]
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            model: ObjectModel::new(),
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// The reference model that mutations are recorded into.
    #[must_use]
    pub fn model(&self) -> &ObjectModel {
        &self.model
    }

    /// Track a bucket owned by the configured owner.
    pub fn create_bucket(&self, name: &str, acl: &AclRequest) -> OracleResult<()> {
        self.model.create_bucket(name, self.config.owner(), acl)
    }

    /// Predict the page a listing request returns.
    pub fn predict_listing(&self, bucket: &str, request: &ListRequest) -> OracleResult<Listing> {
        let handle = self.model.bucket(bucket)?;
        let guard = handle.read();
        ops::list::predict(&guard, request, &self.config)
    }

    /// Predict a bucket ACL (`key` is `None`) or an object ACL.
    pub fn predict_acl(
        &self,
        bucket: &str,
        key: Option<&str>,
        version_id: Option<&str>,
    ) -> OracleResult<AccessControlList> {
        let handle = self.model.bucket(bucket)?;
        let guard = handle.read();
        ops::predict_acl(&guard, key, version_id)
    }

    /// Predict the versioning status `GetBucketVersioning` reports.
    pub fn predict_versioning(&self, bucket: &str) -> OracleResult<VersioningStatus> {
        self.model.versioning(bucket)
    }

    /// Compare a prediction with an observation.
    pub fn verify<T: Diff + ?Sized>(
        &self,
        case: impl Into<String>,
        expected: &T,
        actual: &T,
    ) -> VerificationReport {
        VerificationReport::new(case, expected, actual)
    }
}
