//! Canned ACL resolution.
//!
//! Each canned ACL is a fixed template of `(principal, permission)` rows.
//! Resolution substitutes the owner and bucket owner into the template and
//! collects the result into a [`GrantSet`].
//!
//! | Canned ACL | Grants |
//! |---|---|
//! | `private` | owner:FULL_CONTROL |
//! | `public-read` | owner:FULL_CONTROL, AllUsers:READ |
//! | `public-read-write` | owner:FULL_CONTROL, AllUsers:READ, AllUsers:WRITE |
//! | `authenticated-read` | owner:FULL_CONTROL, AuthenticatedUsers:READ |
//! | `log-delivery-write` | owner:FULL_CONTROL, LogDelivery:WRITE, LogDelivery:READ_ACP |
//! | `bucket-owner-full-control` | owner:FULL_CONTROL, bucketOwner:FULL_CONTROL |
//! | `bucket-owner-read` | owner:FULL_CONTROL, bucketOwner:READ |
//!
//! Bucket-owner rows are dropped when the object owner is the bucket owner.
//! On buckets the two bucket-owner ACLs fall back to `private`, and on object
//! creation `log-delivery-write` falls back to `private`.

use serde::{Deserialize, Serialize};

use super::grant::{CannedAcl, Grant, GrantSet, Grantee, Group, Permission};

/// What the ACL is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclTarget<'a> {
    /// A bucket, at creation or on a later ACL update.
    Bucket,
    /// An object being created (put, copy, or multipart completion).
    NewObject {
        /// Canonical ID of the bucket owner.
        bucket_owner: &'a str,
    },
    /// An existing object whose ACL is being replaced.
    Object {
        /// Canonical ID of the bucket owner.
        bucket_owner: &'a str,
    },
}

/// A template principal, bound to a concrete grantee at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Principal {
    Owner,
    BucketOwner,
    Group(Group),
}

const OWNER_FULL_CONTROL: (Principal, Permission) = (Principal::Owner, Permission::FullControl);

/// The grant template of a canned ACL.
fn template(canned: CannedAcl) -> &'static [(Principal, Permission)] {
    match canned {
        CannedAcl::Private => &[OWNER_FULL_CONTROL],
        CannedAcl::PublicRead => &[
            OWNER_FULL_CONTROL,
            (Principal::Group(Group::AllUsers), Permission::Read),
        ],
        CannedAcl::PublicReadWrite => &[
            OWNER_FULL_CONTROL,
            (Principal::Group(Group::AllUsers), Permission::Read),
            (Principal::Group(Group::AllUsers), Permission::Write),
        ],
        CannedAcl::AuthenticatedRead => &[
            OWNER_FULL_CONTROL,
            (Principal::Group(Group::AuthenticatedUsers), Permission::Read),
        ],
        CannedAcl::LogDeliveryWrite => &[
            OWNER_FULL_CONTROL,
            (Principal::Group(Group::LogDelivery), Permission::Write),
            (Principal::Group(Group::LogDelivery), Permission::ReadAcp),
        ],
        CannedAcl::BucketOwnerFullControl => &[
            OWNER_FULL_CONTROL,
            (Principal::BucketOwner, Permission::FullControl),
        ],
        CannedAcl::BucketOwnerRead => &[
            OWNER_FULL_CONTROL,
            (Principal::BucketOwner, Permission::Read),
        ],
    }
}

/// The canned ACL that actually takes effect on `target`.
///
/// Bucket-owner ACLs are ignored on buckets and `log-delivery-write` is
/// ignored when an object is created; both fall back to `private`.
#[must_use]
pub fn effective_canned(target: AclTarget<'_>, canned: CannedAcl) -> CannedAcl {
    match (target, canned) {
        (AclTarget::Bucket, CannedAcl::BucketOwnerRead | CannedAcl::BucketOwnerFullControl)
        | (AclTarget::NewObject { .. }, CannedAcl::LogDeliveryWrite) => CannedAcl::Private,
        _ => canned,
    }
}

/// Resolve a canned ACL into the exact grant set expected on `target`.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::acl::{AclTarget, CannedAcl, resolve};
///
/// let grants = resolve(
///     AclTarget::Object { bucket_owner: "bucket-owner" },
///     CannedAcl::BucketOwnerFullControl,
///     "object-owner",
/// );
/// assert_eq!(grants.len(), 2);
/// ```
#[must_use]
pub fn resolve(target: AclTarget<'_>, canned: CannedAcl, owner_id: &str) -> GrantSet {
    let bucket_owner = match target {
        AclTarget::Bucket => owner_id,
        AclTarget::NewObject { bucket_owner } | AclTarget::Object { bucket_owner } => bucket_owner,
    };

    template(effective_canned(target, canned))
        .iter()
        .filter(|(principal, _)| !(*principal == Principal::BucketOwner && bucket_owner == owner_id))
        .map(|&(principal, permission)| {
            let grantee = match principal {
                Principal::Owner => Grantee::canonical(owner_id),
                Principal::BucketOwner => Grantee::canonical(bucket_owner),
                Principal::Group(group) => Grantee::group(group),
            };
            Grant::new(grantee, permission)
        })
        .collect()
}

/// Resolve an explicit grant list: the grants as given, plus the owner
/// `FULL_CONTROL` grant the service always injects.
#[must_use]
pub fn resolve_explicit(owner_id: &str, grants: impl IntoIterator<Item = Grant>) -> GrantSet {
    let mut set: GrantSet = grants.into_iter().collect();
    set.insert(Grant::new(Grantee::canonical(owner_id), Permission::FullControl));
    set
}

/// How a request supplies an ACL: a canned name or an explicit grant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum AclRequest {
    /// A canned ACL.
    Canned(CannedAcl),
    /// An explicit grant list.
    Explicit(Vec<Grant>),
}

impl Default for AclRequest {
    fn default() -> Self {
        Self::Canned(CannedAcl::Private)
    }
}

impl From<CannedAcl> for AclRequest {
    fn from(canned: CannedAcl) -> Self {
        Self::Canned(canned)
    }
}

impl AclRequest {
    /// Resolve the request into the grant set expected on `target`.
    #[must_use]
    pub fn resolve(&self, target: AclTarget<'_>, owner_id: &str) -> GrantSet {
        match self {
            Self::Canned(canned) => resolve(target, *canned, owner_id),
            Self::Explicit(grants) => resolve_explicit(owner_id, grants.iter().cloned()),
        }
    }
}
