//! Listing predictions.
//!
//! Computes the exact page a conforming service returns for `ListObjects`
//! (v1), `ListObjectsV2`, `ListObjectVersions` and `ListMultipartUploads`
//! against the current state of a [`BucketModel`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OracleConfig;
use crate::error::{OracleError, OracleResult};
use crate::listing::{
    ListingPage, Marker, ObjectSummary, UploadSummary, VersionSummary, list_page,
};
use crate::state::BucketModel;
use crate::utils::{decode_continuation_token, encode_continuation_token};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `ListObjects` (v1) parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsRequest {
    /// Only keys starting with this prefix.
    pub prefix: Option<String>,
    /// Roll keys up into common prefixes at this delimiter.
    pub delimiter: Option<String>,
    /// Start strictly after this key.
    pub marker: Option<String>,
    /// Page size; the configured default when absent.
    pub max_keys: Option<i32>,
}

/// `ListObjectsV2` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsV2Request {
    /// Only keys starting with this prefix.
    pub prefix: Option<String>,
    /// Roll keys up into common prefixes at this delimiter.
    pub delimiter: Option<String>,
    /// Token returned by the previous page. Takes precedence over
    /// `start_after`.
    pub continuation_token: Option<String>,
    /// Start strictly after this key.
    pub start_after: Option<String>,
    /// Page size; the configured default when absent.
    pub max_keys: Option<i32>,
}

/// `ListObjectVersions` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsRequest {
    /// Only keys starting with this prefix.
    pub prefix: Option<String>,
    /// Roll keys up into common prefixes at this delimiter.
    pub delimiter: Option<String>,
    /// Resume at this key.
    pub key_marker: Option<String>,
    /// Resume after this version of `key_marker`.
    pub version_id_marker: Option<String>,
    /// Page size; the configured default when absent.
    pub max_keys: Option<i32>,
}

/// `ListMultipartUploads` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUploadsRequest {
    /// Only keys starting with this prefix.
    pub prefix: Option<String>,
    /// Roll keys up into common prefixes at this delimiter.
    pub delimiter: Option<String>,
    /// Resume at this key.
    pub key_marker: Option<String>,
    /// Resume after this upload of `key_marker`. Ignored without a key
    /// marker.
    pub upload_id_marker: Option<String>,
    /// Page size; the configured default when absent.
    pub max_uploads: Option<i32>,
}

/// Any listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "api")]
pub enum ListRequest {
    /// `ListObjects`.
    Objects(ListObjectsRequest),
    /// `ListObjectsV2`.
    ObjectsV2(ListObjectsV2Request),
    /// `ListObjectVersions`.
    Versions(ListVersionsRequest),
    /// `ListMultipartUploads`.
    Uploads(ListUploadsRequest),
}

impl From<ListObjectsRequest> for ListRequest {
    fn from(req: ListObjectsRequest) -> Self {
        Self::Objects(req)
    }
}

impl From<ListObjectsV2Request> for ListRequest {
    fn from(req: ListObjectsV2Request) -> Self {
        Self::ObjectsV2(req)
    }
}

impl From<ListVersionsRequest> for ListRequest {
    fn from(req: ListVersionsRequest) -> Self {
        Self::Versions(req)
    }
}

impl From<ListUploadsRequest> for ListRequest {
    fn from(req: ListUploadsRequest) -> Self {
        Self::Uploads(req)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A `ListObjectsV2` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectListingV2 {
    /// The page contents and truncation state.
    pub page: ListingPage<ObjectSummary>,
    /// Entries plus common prefixes on the page.
    pub key_count: usize,
    /// Token for the next page, set only when truncated.
    pub next_continuation_token: Option<String>,
}

/// Any listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "api")]
pub enum Listing {
    /// `ListObjects`.
    Objects(ListingPage<ObjectSummary>),
    /// `ListObjectsV2`.
    ObjectsV2(ObjectListingV2),
    /// `ListObjectVersions`.
    Versions(ListingPage<VersionSummary>),
    /// `ListMultipartUploads`.
    Uploads(ListingPage<UploadSummary>),
}

impl Listing {
    /// Whether more items follow this page.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        match self {
            Self::Objects(page) => page.is_truncated,
            Self::ObjectsV2(v2) => v2.page.is_truncated,
            Self::Versions(page) => page.is_truncated,
            Self::Uploads(page) => page.is_truncated,
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Resolve the page size, rejecting negative values.
fn page_size(config: &OracleConfig, requested: Option<i32>) -> OracleResult<usize> {
    let requested = requested
        .map(usize::try_from)
        .transpose()
        .map_err(|_| OracleError::invalid_argument("max-keys must be a non-negative integer"))?;
    Ok(config.effective_max_keys(requested))
}

/// The latest non-delete-marker object of every key, in key order.
fn current_objects(bucket: &BucketModel) -> impl Iterator<Item = ObjectSummary> + '_ {
    bucket.objects().iter().filter_map(|(_, versions)| {
        versions.first().and_then(|latest| {
            latest.as_object().map(|obj| ObjectSummary {
                key: obj.key.clone(),
                size: obj.size,
            })
        })
    })
}

/// Predict a `ListObjects` (v1) page.
pub fn list_objects(
    bucket: &BucketModel,
    req: &ListObjectsRequest,
    config: &OracleConfig,
) -> OracleResult<ListingPage<ObjectSummary>> {
    let max_keys = page_size(config, req.max_keys)?;
    let page = list_page(
        current_objects(bucket).collect::<Vec<_>>(),
        req.prefix.as_deref().unwrap_or(""),
        req.delimiter.as_deref(),
        Marker {
            key: req.marker.as_deref(),
            secondary: None,
        },
        max_keys,
    );
    debug!(
        bucket = %bucket.name(),
        count = page.entries.len(),
        is_truncated = page.is_truncated,
        "predicted list_objects"
    );
    Ok(page)
}

/// Predict a `ListObjectsV2` page.
pub fn list_objects_v2(
    bucket: &BucketModel,
    req: &ListObjectsV2Request,
    config: &OracleConfig,
) -> OracleResult<ObjectListingV2> {
    let max_keys = page_size(config, req.max_keys)?;
    let decoded = req
        .continuation_token
        .as_deref()
        .map(decode_continuation_token)
        .transpose()?;
    let start = decoded.as_deref().or(req.start_after.as_deref());

    let page = list_page(
        current_objects(bucket).collect::<Vec<_>>(),
        req.prefix.as_deref().unwrap_or(""),
        req.delimiter.as_deref(),
        Marker {
            key: start,
            secondary: None,
        },
        max_keys,
    );
    let next_continuation_token = page
        .next_marker
        .as_deref()
        .map(encode_continuation_token);
    debug!(
        bucket = %bucket.name(),
        count = page.item_count(),
        is_truncated = page.is_truncated,
        "predicted list_objects_v2"
    );
    Ok(ObjectListingV2 {
        key_count: page.item_count(),
        next_continuation_token,
        page,
    })
}

/// Predict a `ListObjectVersions` page.
///
/// Buckets that never had versioning enabled list every object once, as
/// the latest `null` version.
pub fn list_versions(
    bucket: &BucketModel,
    req: &ListVersionsRequest,
    config: &OracleConfig,
) -> OracleResult<ListingPage<VersionSummary>> {
    if req.version_id_marker.is_some() && req.key_marker.is_none() {
        return Err(OracleError::invalid_argument(
            "A version-id marker cannot be specified without a key marker.",
        ));
    }
    let max_keys = page_size(config, req.max_keys)?;
    let entries: Vec<VersionSummary> = bucket
        .objects()
        .iter()
        .flat_map(|(_, versions)| {
            versions
                .iter()
                .enumerate()
                .map(|(idx, v)| VersionSummary::from_record(v, idx == 0))
        })
        .collect();
    let page = list_page(
        entries,
        req.prefix.as_deref().unwrap_or(""),
        req.delimiter.as_deref(),
        Marker {
            key: req.key_marker.as_deref(),
            secondary: req.version_id_marker.as_deref(),
        },
        max_keys,
    );
    debug!(
        bucket = %bucket.name(),
        count = page.entries.len(),
        is_truncated = page.is_truncated,
        "predicted list_object_versions"
    );
    Ok(page)
}

/// Predict a `ListMultipartUploads` page.
pub fn list_uploads(
    bucket: &BucketModel,
    req: &ListUploadsRequest,
    config: &OracleConfig,
) -> OracleResult<ListingPage<UploadSummary>> {
    let max_uploads = page_size(config, req.max_uploads)?;
    let marker = Marker {
        key: req.key_marker.as_deref(),
        secondary: req
            .key_marker
            .as_ref()
            .and(req.upload_id_marker.as_deref()),
    };
    let page = list_page(
        bucket.uploads().iter().map(UploadSummary::from).collect::<Vec<_>>(),
        req.prefix.as_deref().unwrap_or(""),
        req.delimiter.as_deref(),
        marker,
        max_uploads,
    );
    debug!(
        bucket = %bucket.name(),
        count = page.entries.len(),
        is_truncated = page.is_truncated,
        "predicted list_multipart_uploads"
    );
    Ok(page)
}

/// Predict the page for any listing request.
pub fn predict(
    bucket: &BucketModel,
    request: &ListRequest,
    config: &OracleConfig,
) -> OracleResult<Listing> {
    Ok(match request {
        ListRequest::Objects(req) => Listing::Objects(list_objects(bucket, req, config)?),
        ListRequest::ObjectsV2(req) => Listing::ObjectsV2(list_objects_v2(bucket, req, config)?),
        ListRequest::Versions(req) => Listing::Versions(list_versions(bucket, req, config)?),
        ListRequest::Uploads(req) => Listing::Uploads(list_uploads(bucket, req, config)?),
    })
}
