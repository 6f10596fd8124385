//! Reference model and correctness oracle for S3-compatible object stores.
//!
//! The oracle tracks the mutations a test driver applies to a bucket (puts,
//! deletes, versioning changes, ACL changes, multipart uploads) and predicts
//! exactly what a conforming service returns for listings and ACL reads.
//! Observed responses are diffed against the prediction field by field.
//!
//! # Architecture
//!
//! ```text
//!        Oracle (predict_listing / predict_acl / verify)
//!          |                    |                  |
//!          v                    v                  v
//!   ops::list  ------>  listing (aggregate,   verify (Diff,
//!          |            paginate)              Mismatch)
//!          v
//!   state::ObjectModel -> BucketModel -> VersionedKeyStore / UploadTable
//!          |
//!          v
//!   acl (grant model, canned ACL resolver)
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod listing;
pub mod ops;
pub mod oracle;
pub mod state;
pub mod utils;
pub mod verify;

pub use config::OracleConfig;
pub use error::{OracleError, OracleResult, Outcome};
pub use oracle::Oracle;
