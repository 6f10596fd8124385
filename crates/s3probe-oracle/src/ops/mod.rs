//! Oracle predictions over the reference model.
//!
//! - [`list`] -- listing pages for every listing API
//! - [`acl`] -- bucket and object ACLs

pub mod acl;
pub mod list;

pub use acl::predict_acl;
pub use list::{
    ListObjectsRequest, ListObjectsV2Request, ListRequest, ListUploadsRequest, ListVersionsRequest,
    Listing, ObjectListingV2,
};
