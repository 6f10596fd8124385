//! ACL predictions.

use tracing::debug;

use crate::acl::AccessControlList;
use crate::error::OracleResult;
use crate::state::BucketModel;

/// Predict the `GetBucketAcl` response when `key` is `None`, otherwise the
/// `GetObjectAcl` response for `key` (at `version_id`, or the latest
/// version).
pub fn predict_acl(
    bucket: &BucketModel,
    key: Option<&str>,
    version_id: Option<&str>,
) -> OracleResult<AccessControlList> {
    let acl = match key {
        None => bucket.acl(),
        Some(key) => bucket.object_acl(key, version_id)?,
    };
    debug!(bucket = %bucket.name(), key = ?key, grants = %acl.grants, "predicted acl");
    Ok(acl)
}
