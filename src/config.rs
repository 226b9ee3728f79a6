//! Configuration for the movie search service.
//!
//! # Example
//!
//! ```
//! use movie_search::SearchConfig;
//!
//! // Minimal config (uses defaults)
//! let config = SearchConfig::default();
//! assert_eq!(config.default_page_size, 20);
//! assert_eq!(config.full_index_name(), "idx:movies");
//!
//! // Full config
//! let config = SearchConfig {
//!     redis_url: Some("redis://localhost:6379".into()),
//!     redis_prefix: Some("catalog:".into()),
//!     query_timeout_ms: 2_000,
//!     max_retries: 2,
//!     ..Default::default()
//! };
//! assert_eq!(config.full_index_name(), "catalog:idx:movies");
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::resilience::retry::RetryConfig;
use crate::search::{FieldRegistry, FieldSpec, Pager};

/// Configuration for the search service.
///
/// All fields have sensible defaults. The Redis backend additionally needs
/// `redis_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Redis connection string (e.g., "redis://localhost:6379")
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Namespace prefix prepended to the index name
    #[serde(default)]
    pub redis_prefix: Option<String>,

    /// RediSearch index to query (default: "idx:movies")
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Page size used when a request asks for size <= 0 (default: 20)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Deadline for one FT.SEARCH round trip in ms (0 = none)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Extra attempts for transient engine failures (default: 0)
    #[serde(default)]
    pub max_retries: usize,

    /// Field table; empty means the built-in movie table
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_index_name() -> String { "idx:movies".to_string() }
fn default_page_size() -> usize { 20 }
fn default_query_timeout_ms() -> u64 { 5_000 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            redis_prefix: None,
            index_name: default_index_name(),
            default_page_size: default_page_size(),
            query_timeout_ms: default_query_timeout_ms(),
            max_retries: 0,
            fields: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Index name with the namespace prefix applied.
    pub fn full_index_name(&self) -> String {
        format!("{}{}", self.redis_prefix.as_deref().unwrap_or(""), self.index_name)
    }

    /// Round-trip deadline, `None` when disabled.
    pub fn query_timeout(&self) -> Option<Duration> {
        match self.query_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// The field registry this config describes.
    pub fn field_registry(&self) -> FieldRegistry {
        if self.fields.is_empty() {
            FieldRegistry::movies()
        } else {
            FieldRegistry::from_specs(&self.fields)
        }
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.default_page_size)
    }

    /// Caller-side retry policy for transient engine errors.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::search(self.max_retries)
    }
}
