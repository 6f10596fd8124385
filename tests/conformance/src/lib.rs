//! Conformance tests for S3-compatible services.
//!
//! Every scenario runs against two backends:
//!
//! - [`model::ModelBackend`], an in-process copy of the reference model, so
//!   the scenarios and the driver are always exercised;
//! - [`live::LiveBackend`], a running server at `S3_ENDPOINT_URL`
//!   (default `localhost:4566`). These tests are marked `#[ignore]` so they
//!   don't run during normal `cargo test`.
//!
//! Run the live tests with:
//! ```text
//! cargo test -p s3probe-conformance -- --ignored
//! ```

use std::sync::Once;
use std::time::Duration;

use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use s3probe_oracle::OracleConfig;
use tracing_subscriber::EnvFilter;

pub mod backend;
pub mod scenarios;

pub use backend::{Rejection, S3Backend};
pub use context::TestContext;

static INIT: Once = Once::new();

/// Initialize tracing (once).
///
/// Uses `RUST_LOG` if set, otherwise the `LOG_LEVEL` value of
/// [`OracleConfig`].
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| level_filter(&OracleConfig::from_env().log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Parse a `LOG_LEVEL` filter string, falling back to `warn` when invalid.
fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Connection and retry settings for the live backend.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Service endpoint.
    pub endpoint_url: String,
    /// Signing region.
    pub region: String,
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Retries of a request answered with a 5xx status.
    pub max_retries: u32,
    /// Backoff unit between retries and versioning polls.
    pub retry_backoff: Duration,
    /// How many times to poll for a versioning change to apply.
    pub versioning_poll_attempts: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:4566".to_owned(),
            region: "us-east-1".to_owned(),
            access_key_id: "test".to_owned(),
            secret_access_key: "test".to_owned(),
            max_retries: 3,
            retry_backoff: Duration::from_millis(200),
            versioning_poll_attempts: 10,
        }
    }
}

impl DriverConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `S3_ENDPOINT_URL` | `http://localhost:4566` |
    /// | `S3_REGION` | `us-east-1` |
    /// | `AWS_ACCESS_KEY_ID` | `test` |
    /// | `AWS_SECRET_ACCESS_KEY` | `test` |
    /// | `S3_MAX_RETRIES` | `3` |
    /// | `S3_RETRY_BACKOFF_MS` | `200` |
    /// | `S3_VERSIONING_POLL_ATTEMPTS` | `10` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("S3_ENDPOINT_URL") {
            config.endpoint_url = v;
        }
        if let Ok(v) = std::env::var("S3_REGION") {
            config.region = v;
        }
        if let Ok(v) = std::env::var("AWS_ACCESS_KEY_ID") {
            config.access_key_id = v;
        }
        if let Ok(v) = std::env::var("AWS_SECRET_ACCESS_KEY") {
            config.secret_access_key = v;
        }
        if let Ok(v) = std::env::var("S3_MAX_RETRIES") {
            if let Ok(n) = v.parse() {
                config.max_retries = n;
            }
        }
        if let Ok(v) = std::env::var("S3_RETRY_BACKOFF_MS") {
            if let Ok(ms) = v.parse() {
                config.retry_backoff = Duration::from_millis(ms);
            }
        }
        if let Ok(v) = std::env::var("S3_VERSIONING_POLL_ATTEMPTS") {
            if let Ok(n) = v.parse() {
                config.versioning_poll_attempts = n;
            }
        }

        config
    }
}

/// Create a configured S3 client pointing at the configured server.
#[must_use]
pub fn s3_client(config: &DriverConfig) -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "conformance-test",
    );

    let sdk_config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(creds)
        .endpoint_url(&config.endpoint_url)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(sdk_config)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_default_to_local_endpoint() {
        let config = DriverConfig::default();
        assert_eq!(config.endpoint_url, "http://localhost:4566");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff, Duration::from_millis(200));
    }

    #[test]
    fn test_should_build_filter_from_log_level() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(level_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            level_filter("s3probe=loud").max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn test_should_generate_unique_bucket_names() {
        let a = test_bucket_name("list");
        let b = test_bucket_name("list");
        assert_ne!(a, b);
        assert!(a.starts_with("test-list-"));
        assert_eq!(a.len(), "test-list-".len() + 8);
    }
}
