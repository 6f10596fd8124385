//! Structural comparison of predictions against observed responses.
//!
//! [`compare`] walks an expected and an actual value side by side and
//! returns one [`Mismatch`] per diverging field. Mismatches are data: the
//! comparison never fails and has no side effects besides logging.
//!
//! Grant sets compare as sets (cardinality plus missing and unexpected
//! grants). Owners compare by canonical ID only; display names vary between
//! implementations and are not part of the contract.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::acl::{AccessControlList, GrantSet, Owner};
use crate::error::Outcome;
use crate::listing::{ListingPage, ObjectSummary, UploadSummary, VersionSummary};
use crate::ops::{Listing, ObjectListingV2};
use crate::state::VersioningStatus;

// ---------------------------------------------------------------------------
// Mismatch
// ---------------------------------------------------------------------------

/// One field where the observed response diverges from the prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    /// Path of the field, e.g. `entries[2].versionId`.
    pub field: String,
    /// The predicted value.
    pub expected: String,
    /// The observed value.
    pub actual: String,
}

impl Mismatch {
    /// Create a mismatch.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Field-by-field structural comparison.
pub trait Diff {
    /// Append a [`Mismatch`] to `out` for every field of `actual` that
    /// differs from `self`. `path` names `self` within the compared value.
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>);
}

/// Compare a prediction with an observation.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::listing::ObjectSummary;
/// use s3probe_oracle::verify::compare;
///
/// let expected = vec![ObjectSummary { key: "a".to_owned(), size: 1 }];
/// let actual = vec![ObjectSummary { key: "b".to_owned(), size: 1 }];
/// let mismatches = compare(&expected, &actual);
/// assert_eq!(mismatches.len(), 1);
/// assert_eq!(mismatches[0].field, "[0].key");
/// ```
#[must_use]
pub fn compare<T: Diff + ?Sized>(expected: &T, actual: &T) -> Vec<Mismatch> {
    let mut out = Vec::new();
    expected.diff(actual, "", &mut out);
    out
}

fn field(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{path}.{name}")
    }
}

fn diff_value<T: PartialEq + fmt::Debug>(
    expected: &T,
    actual: &T,
    path: String,
    out: &mut Vec<Mismatch>,
) {
    if expected != actual {
        out.push(Mismatch::new(
            path,
            format!("{expected:?}"),
            format!("{actual:?}"),
        ));
    }
}

macro_rules! impl_diff_for_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Diff for $ty {
                fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
                    diff_value(self, actual, path.to_owned(), out);
                }
            }
        )*
    };
}

impl_diff_for_value!((), String, bool, u64, usize, VersioningStatus);

impl<T: Diff + fmt::Debug> Diff for Option<T> {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        match (self, actual) {
            (Some(e), Some(a)) => e.diff(a, path, out),
            (None, None) => {}
            _ => out.push(Mismatch::new(
                path,
                format!("{self:?}"),
                format!("{actual:?}"),
            )),
        }
    }
}

impl<T: Diff> Diff for [T] {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        if self.len() != actual.len() {
            out.push(Mismatch::new(
                field(path, "len"),
                self.len().to_string(),
                actual.len().to_string(),
            ));
        }
        for (i, (e, a)) in self.iter().zip(actual).enumerate() {
            e.diff(a, &format!("{path}[{i}]"), out);
        }
    }
}

impl<T: Diff> Diff for Vec<T> {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.as_slice().diff(actual.as_slice(), path, out);
    }
}

// ---------------------------------------------------------------------------
// Listing types
// ---------------------------------------------------------------------------

impl Diff for ObjectSummary {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.key.diff(&actual.key, &field(path, "key"), out);
        self.size.diff(&actual.size, &field(path, "size"), out);
    }
}

impl Diff for VersionSummary {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.key.diff(&actual.key, &field(path, "key"), out);
        self.version_id
            .diff(&actual.version_id, &field(path, "versionId"), out);
        self.is_latest
            .diff(&actual.is_latest, &field(path, "isLatest"), out);
        self.is_delete_marker
            .diff(&actual.is_delete_marker, &field(path, "isDeleteMarker"), out);
        if !self.is_delete_marker {
            self.size.diff(&actual.size, &field(path, "size"), out);
        }
    }
}

impl Diff for UploadSummary {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.key.diff(&actual.key, &field(path, "key"), out);
        self.upload_id
            .diff(&actual.upload_id, &field(path, "uploadId"), out);
    }
}

impl<E: Diff> Diff for ListingPage<E> {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.entries
            .diff(&actual.entries, &field(path, "entries"), out);
        self.common_prefixes
            .diff(&actual.common_prefixes, &field(path, "commonPrefixes"), out);
        self.is_truncated
            .diff(&actual.is_truncated, &field(path, "isTruncated"), out);
        self.next_marker
            .diff(&actual.next_marker, &field(path, "nextMarker"), out);
        self.next_secondary_marker.diff(
            &actual.next_secondary_marker,
            &field(path, "nextSecondaryMarker"),
            out,
        );
    }
}

impl Diff for ObjectListingV2 {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        // V2 pages resume by token, not by marker.
        self.page
            .entries
            .diff(&actual.page.entries, &field(path, "entries"), out);
        self.page.common_prefixes.diff(
            &actual.page.common_prefixes,
            &field(path, "commonPrefixes"),
            out,
        );
        self.page
            .is_truncated
            .diff(&actual.page.is_truncated, &field(path, "isTruncated"), out);
        self.key_count
            .diff(&actual.key_count, &field(path, "keyCount"), out);
        // Tokens are opaque; only their presence is part of the contract.
        diff_value(
            &self.next_continuation_token.is_some(),
            &actual.next_continuation_token.is_some(),
            field(path, "nextContinuationToken"),
            out,
        );
    }
}

impl Diff for Listing {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        match (self, actual) {
            (Self::Objects(e), Self::Objects(a)) => e.diff(a, path, out),
            (Self::ObjectsV2(e), Self::ObjectsV2(a)) => e.diff(a, path, out),
            (Self::Versions(e), Self::Versions(a)) => e.diff(a, path, out),
            (Self::Uploads(e), Self::Uploads(a)) => e.diff(a, path, out),
            _ => out.push(Mismatch::new(
                field(path, "api"),
                self.api_name(),
                actual.api_name(),
            )),
        }
    }
}

impl Listing {
    fn api_name(&self) -> &'static str {
        match self {
            Self::Objects(_) => "ListObjects",
            Self::ObjectsV2(_) => "ListObjectsV2",
            Self::Versions(_) => "ListObjectVersions",
            Self::Uploads(_) => "ListMultipartUploads",
        }
    }
}

// ---------------------------------------------------------------------------
// ACL types
// ---------------------------------------------------------------------------

impl Diff for GrantSet {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        if self.len() != actual.len() {
            out.push(Mismatch::new(
                field(path, "len"),
                self.len().to_string(),
                actual.len().to_string(),
            ));
        }
        for missing in self.difference(actual) {
            out.push(Mismatch::new(path, missing.to_string(), "<missing>"));
        }
        for unexpected in actual.difference(self) {
            out.push(Mismatch::new(path, "<absent>", unexpected.to_string()));
        }
    }
}

impl Diff for Owner {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.id.diff(&actual.id, &field(path, "id"), out);
    }
}

impl Diff for AccessControlList {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        self.owner.diff(&actual.owner, &field(path, "owner"), out);
        self.grants.diff(&actual.grants, &field(path, "grants"), out);
    }
}

impl<T: Diff> Diff for Outcome<T> {
    fn diff(&self, actual: &Self, path: &str, out: &mut Vec<Mismatch>) {
        match (self, actual) {
            (Self::Value(e), Self::Value(a)) => e.diff(a, path, out),
            (Self::Rejected(e), Self::Rejected(a)) => {
                e.diff(a, &field(path, "errorCode"), out);
            }
            (Self::Value(_), Self::Rejected(code)) => {
                out.push(Mismatch::new(field(path, "outcome"), "success", code.as_str()));
            }
            (Self::Rejected(code), Self::Value(_)) => {
                out.push(Mismatch::new(field(path, "outcome"), code.as_str(), "success"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// VerificationReport
// ---------------------------------------------------------------------------

/// The result of verifying one observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// What was verified, e.g. `list_objects page 2`.
    pub case: String,
    /// Every diverging field. Empty when the observation conforms.
    pub mismatches: Vec<Mismatch>,
}

impl VerificationReport {
    /// Compare `expected` with `actual` and record the result under `case`.
    /// Each mismatch is logged at `warn`.
    pub fn new<T: Diff + ?Sized>(case: impl Into<String>, expected: &T, actual: &T) -> Self {
        let case = case.into();
        let mismatches = compare(expected, actual);
        for m in &mismatches {
            warn!(case = %case, field = %m.field, expected = %m.expected, actual = %m.actual, "mismatch");
        }
        Self { case, mismatches }
    }

    /// Whether the observation matched the prediction.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Turn a report with mismatches into an error describing all of them.
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.is_clean() {
            return Ok(());
        }
        anyhow::bail!("{self}")
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "{}: ok", self.case);
        }
        write!(f, "{}: {} mismatch(es)", self.case, self.mismatches.len())?;
        for m in &self.mismatches {
            write!(f, "\n  {m}")?;
        }
        Ok(())
    }
}
