//! Shared utilities for the oracle.
//!
//! Provides identifier generation for versions and multipart uploads, and
//! continuation-token encoding for `ListObjectsV2`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use rand::RngExt;

use crate::error::{OracleError, OracleResult};

/// The version ID given to objects written while versioning is not enabled.
pub const NULL_VERSION_ID: &str = "null";

// ---------------------------------------------------------------------------
// ID generation
// ---------------------------------------------------------------------------

/// Generate a random version ID.
///
/// Produces a URL-safe base64 string of 32 characters.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::utils::generate_version_id;
///
/// let id = generate_version_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
#[must_use]
pub fn generate_version_id() -> String {
    let mut rng = rand::rng();
    let mut buf = [0u8; 24];
    rng.fill(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Generate a random upload ID for multipart uploads.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::utils::generate_upload_id;
///
/// let id = generate_upload_id();
/// assert_eq!(id.len(), 64);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn generate_upload_id() -> String {
    let mut rng = rand::rng();
    let mut buf = [0u8; 32];
    rng.fill(&mut buf);
    hex::encode(buf)
}

// ---------------------------------------------------------------------------
// Continuation tokens
// ---------------------------------------------------------------------------

/// Encode a key (or common prefix) as an opaque `ListObjectsV2`
/// continuation token.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::utils::{decode_continuation_token, encode_continuation_token};
///
/// let token = encode_continuation_token("photos/2024/img.jpg");
/// let key = decode_continuation_token(&token).unwrap();
/// assert_eq!(key, "photos/2024/img.jpg");
/// ```
#[must_use]
pub fn encode_continuation_token(key: &str) -> String {
    BASE64_STANDARD.encode(key.as_bytes())
}

/// Decode a continuation token back to the key it resumes after.
///
/// # Errors
///
/// Returns [`OracleError::InvalidArgument`] if the token is not valid base64
/// or does not decode to valid UTF-8.
pub fn decode_continuation_token(token: &str) -> OracleResult<String> {
    let bytes = BASE64_STANDARD
        .decode(token)
        .map_err(|_| OracleError::invalid_argument("The continuation token provided is incorrect"))?;
    String::from_utf8(bytes)
        .map_err(|_| OracleError::invalid_argument("Continuation token contains invalid UTF-8"))
}
