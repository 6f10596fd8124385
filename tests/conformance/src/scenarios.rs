//! Conformance scenarios, generic over the backend.
//!
//! Each scenario creates its own bucket, drives mutations through a
//! [`TestContext`], verifies every read against the oracle and removes the
//! bucket again. A scenario fails on the first report with mismatches.

use s3probe_oracle::acl::{AclRequest, CannedAcl, Grant, Grantee, Group, Permission};
use s3probe_oracle::ops::{
    ListObjectsRequest, ListObjectsV2Request, ListRequest, ListUploadsRequest,
    ListVersionsRequest, Listing,
};
use s3probe_oracle::state::VersioningStatus;

use crate::backend::S3Backend;
use crate::context::TestContext;

/// Canned ACLs a bucket can be created with.
const BUCKET_ACLS: [CannedAcl; 5] = [
    CannedAcl::Private,
    CannedAcl::PublicRead,
    CannedAcl::PublicReadWrite,
    CannedAcl::AuthenticatedRead,
    CannedAcl::LogDeliveryWrite,
];

/// Verify `request` and every following page, feeding the oracle's next
/// markers into the next request. Returns the number of pages.
async fn verify_pages<B: S3Backend>(
    ctx: &TestContext<'_, B>,
    mut request: ListRequest,
) -> anyhow::Result<usize> {
    let mut pages = 0;
    loop {
        ctx.verify_listing(&request).await?.into_result()?;
        pages += 1;
        let listing = ctx.oracle().predict_listing(ctx.bucket(), &request)?;
        if !listing.is_truncated() {
            return Ok(pages);
        }
        match (&mut request, listing) {
            (ListRequest::Objects(req), Listing::Objects(page)) => {
                req.marker = page.next_marker;
            }
            // Continuation tokens are opaque; resume after the last item
            // instead so both sides see the same request.
            (ListRequest::ObjectsV2(req), Listing::ObjectsV2(v2)) => {
                req.continuation_token = None;
                req.start_after = v2.page.next_marker;
            }
            (ListRequest::Versions(req), Listing::Versions(page)) => {
                req.key_marker = page.next_marker;
                req.version_id_marker = page.next_secondary_marker;
            }
            (ListRequest::Uploads(req), Listing::Uploads(page)) => {
                req.key_marker = page.next_marker;
                req.upload_id_marker = page.next_secondary_marker;
            }
            _ => anyhow::bail!("listing does not answer the request"),
        }
    }
}

/// Bucket ACLs resolve exactly as the canned templates say.
pub async fn canned_bucket_acls<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    for canned in BUCKET_ACLS {
        let ctx = TestContext::new(backend, "bacl", &canned.into()).await?;
        ctx.verify_acl(None, None).await?.into_result()?;

        ctx.set_acl(None, None, &CannedAcl::PublicRead.into())
            .await?;
        ctx.verify_acl(None, None).await?.into_result()?;
        ctx.cleanup().await?;
    }
    Ok(())
}

/// Object ACLs across creation, canned replacement and explicit grants.
pub async fn object_acls<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "oacl", &AclRequest::default()).await?;

    ctx.put_with("public", 1, &CannedAcl::PublicRead.into())
        .await?;
    ctx.verify_acl(Some("public"), None).await?.into_result()?;

    ctx.put_with("logs", 1, &CannedAcl::LogDeliveryWrite.into())
        .await?;
    ctx.verify_acl(Some("logs"), None).await?.into_result()?;

    ctx.put("plain").await?;
    ctx.set_acl(Some("plain"), None, &CannedAcl::AuthenticatedRead.into())
        .await?;
    ctx.verify_acl(Some("plain"), None).await?.into_result()?;

    ctx.set_acl(Some("plain"), None, &CannedAcl::BucketOwnerFullControl.into())
        .await?;
    ctx.verify_acl(Some("plain"), None).await?.into_result()?;

    let owner = Grantee::canonical(ctx.oracle().config().owner_id.clone());
    let grants = vec![
        Grant::new(owner, Permission::FullControl),
        Grant::new(Grantee::group(Group::AllUsers), Permission::ReadAcp),
    ];
    ctx.set_acl(Some("plain"), None, &AclRequest::Explicit(grants))
        .await?;
    ctx.verify_acl(Some("plain"), None).await?.into_result()?;

    ctx.verify_acl(Some("missing"), None).await?.into_result()?;
    ctx.cleanup().await
}

/// Keys list in ascending byte order regardless of insertion order.
pub async fn lexicographic_listing<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "order", &AclRequest::default()).await?;
    for key in ["a1", "b2", "a0", "B", "a/b"] {
        ctx.put(key).await?;
    }
    ctx.verify_listing(&ListObjectsRequest::default().into())
        .await?
        .into_result()?;
    ctx.verify_listing(&ListObjectsV2Request::default().into())
        .await?
        .into_result()?;
    ctx.verify_listing(
        &ListObjectsRequest {
            marker: Some("a0".to_owned()),
            ..ListObjectsRequest::default()
        }
        .into(),
    )
    .await?
    .into_result()?;
    ctx.cleanup().await
}

/// Keys roll up into common prefixes at the delimiter.
pub async fn delimiter_listing<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "delim", &AclRequest::default()).await?;
    for key in ["p/x", "p/y", "p/z/1", "q", "r/1"] {
        ctx.put(key).await?;
    }
    for prefix in [None, Some("p/"), Some("p"), Some("nothing")] {
        let request = ListObjectsRequest {
            prefix: prefix.map(ToOwned::to_owned),
            delimiter: Some("/".to_owned()),
            ..ListObjectsRequest::default()
        };
        ctx.verify_listing(&request.into()).await?.into_result()?;
    }
    let pages = verify_pages(
        &ctx,
        ListObjectsRequest {
            delimiter: Some("/".to_owned()),
            max_keys: Some(1),
            ..ListObjectsRequest::default()
        }
        .into(),
    )
    .await?;
    anyhow::ensure!(pages == 3, "expected 3 single-item pages, got {pages}");
    ctx.cleanup().await
}

/// Seven keys page by three into pages of 3, 3 and 1.
pub async fn marker_pagination<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "page", &AclRequest::default()).await?;
    for i in 1..=7 {
        ctx.put(&format!("key-{i}")).await?;
    }

    let v1 = ListObjectsRequest {
        max_keys: Some(3),
        ..ListObjectsRequest::default()
    };
    let pages = verify_pages(&ctx, v1.into()).await?;
    anyhow::ensure!(pages == 3, "expected 3 pages, got {pages}");

    let v2 = ListObjectsV2Request {
        max_keys: Some(3),
        ..ListObjectsV2Request::default()
    };
    let pages = verify_pages(&ctx, v2.into()).await?;
    anyhow::ensure!(pages == 3, "expected 3 pages, got {pages}");

    let empty = ListObjectsRequest {
        max_keys: Some(0),
        ..ListObjectsRequest::default()
    };
    ctx.verify_listing(&empty.into()).await?.into_result()?;
    ctx.cleanup().await
}

/// A delete on a versioned bucket stacks a delete marker on the history.
pub async fn versioned_delete<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "ver", &AclRequest::default()).await?;
    ctx.verify_versioning().await?.into_result()?;
    ctx.set_versioning(VersioningStatus::Enabled)
        .await?
        .into_result()?;
    ctx.verify_versioning().await?.into_result()?;

    for _ in 0..3 {
        ctx.put("k").await?;
    }
    ctx.put("other").await?;
    ctx.delete("k").await?;

    ctx.verify_listing(&ListVersionsRequest::default().into())
        .await?
        .into_result()?;
    ctx.verify_listing(&ListObjectsRequest::default().into())
        .await?
        .into_result()?;
    verify_pages(
        &ctx,
        ListVersionsRequest {
            max_keys: Some(2),
            ..ListVersionsRequest::default()
        }
        .into(),
    )
    .await?;
    ctx.cleanup().await
}

/// Suspending versioning reuses a single `null` version per key; resuming
/// keeps the history written meanwhile.
pub async fn suspend_and_resume<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "susp", &AclRequest::default()).await?;
    ctx.put("k").await?;
    ctx.set_versioning(VersioningStatus::Enabled)
        .await?
        .into_result()?;
    ctx.put("k").await?;
    ctx.set_versioning(VersioningStatus::Suspended)
        .await?
        .into_result()?;
    ctx.put("k").await?;
    ctx.put("k").await?;
    ctx.delete("k").await?;
    ctx.verify_listing(&ListVersionsRequest::default().into())
        .await?
        .into_result()?;

    ctx.set_versioning(VersioningStatus::Enabled)
        .await?
        .into_result()?;
    ctx.put("k").await?;
    ctx.verify_listing(&ListVersionsRequest::default().into())
        .await?
        .into_result()?;

    ctx.delete_version("k", "null").await?;
    ctx.verify_listing(&ListVersionsRequest::default().into())
        .await?
        .into_result()?;
    ctx.verify_versioning().await?.into_result()?;
    ctx.cleanup().await
}

/// Turning versioning back off is rejected.
pub async fn versioning_off_rejected<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "off", &AclRequest::default()).await?;
    ctx.set_versioning(VersioningStatus::Enabled)
        .await?
        .into_result()?;
    ctx.set_versioning(VersioningStatus::Disabled)
        .await?
        .into_result()?;
    ctx.verify_versioning().await?.into_result()?;
    ctx.cleanup().await
}

/// In-progress uploads list and page by key then upload ID; completing one
/// turns it into an object.
pub async fn multipart_uploads<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "mpu", &AclRequest::default()).await?;
    let big = ctx
        .create_upload("big", &CannedAcl::PublicRead.into())
        .await?;
    ctx.create_upload("big", &AclRequest::default()).await?;
    let other = ctx.create_upload("dir/other", &AclRequest::default()).await?;

    ctx.verify_listing(&ListUploadsRequest::default().into())
        .await?
        .into_result()?;
    ctx.verify_listing(
        &ListUploadsRequest {
            delimiter: Some("/".to_owned()),
            ..ListUploadsRequest::default()
        }
        .into(),
    )
    .await?
    .into_result()?;
    let pages = verify_pages(
        &ctx,
        ListUploadsRequest {
            max_uploads: Some(1),
            ..ListUploadsRequest::default()
        }
        .into(),
    )
    .await?;
    anyhow::ensure!(pages == 3, "expected 3 pages, got {pages}");

    ctx.complete_upload("big", &big, 5).await?;
    ctx.verify_listing(&ListObjectsRequest::default().into())
        .await?
        .into_result()?;
    ctx.verify_acl(Some("big"), None).await?.into_result()?;

    ctx.abort_upload("dir/other", &other).await?.into_result()?;
    ctx.abort_upload("dir/other", &other).await?.into_result()?;
    ctx.verify_listing(&ListUploadsRequest::default().into())
        .await?
        .into_result()?;
    ctx.cleanup().await
}

/// Malformed listing requests are rejected the same way on both sides.
pub async fn invalid_listing_arguments<B: S3Backend>(backend: &B) -> anyhow::Result<()> {
    let ctx = TestContext::new(backend, "badarg", &AclRequest::default()).await?;
    ctx.put("k").await?;
    ctx.verify_listing(
        &ListVersionsRequest {
            version_id_marker: Some("null".to_owned()),
            ..ListVersionsRequest::default()
        }
        .into(),
    )
    .await?
    .into_result()?;
    ctx.verify_listing(
        &ListObjectsRequest {
            max_keys: Some(-1),
            ..ListObjectsRequest::default()
        }
        .into(),
    )
    .await?
    .into_result()?;
    ctx.cleanup().await
}
