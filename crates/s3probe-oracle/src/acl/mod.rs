//! Grant model and canned ACL resolution.
//!
//! - [`Owner`] / [`Grantee`] / [`Permission`] / [`Grant`] / [`GrantSet`] -- ACL value types
//! - [`CannedAcl`] -- predefined grant templates
//! - [`resolve`] / [`resolve_explicit`] / [`AclRequest`] -- turn a canned or explicit ACL into
//!   the grant set a conforming service reports

mod grant;
mod resolver;

pub use grant::{AccessControlList, CannedAcl, Grant, GrantSet, Grantee, Group, Owner, Permission};
pub use resolver::{AclRequest, AclTarget, effective_canned, resolve, resolve_explicit};
