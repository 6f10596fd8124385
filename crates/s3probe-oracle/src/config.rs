//! Oracle configuration.
//!
//! Provides [`OracleConfig`] for tuning listing defaults and the identity of
//! the default bucket owner. Values are loaded from environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::acl::Owner;

/// Default canonical ID used for the owner of buckets and objects.
const DEFAULT_OWNER_ID: &str = "75aa57f09aa0c8caeab4f8c24e99d10f8e7faeebf76c078efc7c6caea54ba06a";

/// Oracle configuration.
///
/// # Examples
///
/// ```
/// use s3probe_oracle::config::OracleConfig;
///
/// let config = OracleConfig::default();
/// assert_eq!(config.default_max_keys, 1000);
/// assert_eq!(config.effective_max_keys(Some(5000)), 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct OracleConfig {
    /// Page size used when a listing request does not specify one.
    #[builder(default = 1000)]
    pub default_max_keys: usize,

    /// Upper bound on any requested page size.
    #[builder(default = 1000)]
    pub max_keys_limit: usize,

    /// Canonical ID of the default owner.
    #[builder(default = String::from(DEFAULT_OWNER_ID))]
    pub owner_id: String,

    /// Display name of the default owner.
    #[builder(default = String::from("webfile"))]
    pub owner_display_name: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            default_max_keys: 1000,
            max_keys_limit: 1000,
            owner_id: String::from(DEFAULT_OWNER_ID),
            owner_display_name: String::from("webfile"),
            log_level: String::from("info"),
        }
    }
}

impl OracleConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `ORACLE_DEFAULT_MAX_KEYS` | `1000` |
    /// | `ORACLE_MAX_KEYS_LIMIT` | `1000` |
    /// | `ORACLE_OWNER_ID` | the well-known `webfile` canonical ID |
    /// | `ORACLE_OWNER_NAME` | `webfile` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("ORACLE_DEFAULT_MAX_KEYS") {
            if let Ok(n) = v.parse::<usize>() {
                config.default_max_keys = n;
            }
        }
        if let Ok(v) = std::env::var("ORACLE_MAX_KEYS_LIMIT") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_keys_limit = n;
            }
        }
        if let Ok(v) = std::env::var("ORACLE_OWNER_ID") {
            config.owner_id = v;
        }
        if let Ok(v) = std::env::var("ORACLE_OWNER_NAME") {
            config.owner_display_name = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The owner identity described by this configuration.
    #[must_use]
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.owner_id.clone(),
            display_name: self.owner_display_name.clone(),
        }
    }

    /// Resolve a requested page size: the default when absent, clamped to
    /// [`Self::max_keys_limit`].
    #[must_use]
    pub fn effective_max_keys(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_max_keys)
            .min(self.max_keys_limit)
    }
}
