//! Configuration for a bookshelf context.

use crate::error::ConfigError;
use crate::store::DEFAULT_TITLE;
use serde::Deserialize;
use shelfcache::EvictionPolicy;
use std::time::Duration;

/// Region the repository's fixed operations use unless configured otherwise.
pub const DEFAULT_CACHE: &str = "default";

/// Second region available for per-call selection.
pub const ANOTHER_CACHE: &str = "another";

/// Settings for the cache manager, the repository and the backing store.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// let config: bookshelf::BookshelfConfig =
///     serde_json::from_str(r#"{ "max_entries": 50, "eviction_policy": "fifo" }"#).unwrap();
/// assert_eq!(config.default_cache, "default");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookshelfConfig {
    /// Regions the cache manager knows. Unknown names fail resolution.
    pub cache_names: Vec<String>,
    /// Region used by find, update and remove.
    pub default_cache: String,
    /// Per-region entry bound. `None` is unbounded.
    pub max_entries: Option<usize>,
    /// Seconds before an entry expires. `None` never expires.
    pub ttl_secs: Option<u64>,
    pub eviction_policy: EvictionPolicy,
    pub allow_absent_values: bool,
    /// Title of books the store creates on first lookup.
    pub default_title: String,
    /// Simulated latency of a store lookup, in milliseconds.
    pub lookup_delay_ms: Option<u64>,
}

impl Default for BookshelfConfig {
    fn default() -> Self {
        Self {
            cache_names: vec![DEFAULT_CACHE.to_string(), ANOTHER_CACHE.to_string()],
            default_cache: DEFAULT_CACHE.to_string(),
            max_entries: None,
            ttl_secs: None,
            eviction_policy: EvictionPolicy::default(),
            allow_absent_values: true,
            default_title: DEFAULT_TITLE.to_string(),
            lookup_delay_ms: None,
        }
    }
}

impl BookshelfConfig {
    pub fn builder() -> BookshelfConfigBuilder {
        BookshelfConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_names.is_empty() {
            return Err(ConfigError::NoCacheNames);
        }
        if !self.cache_names.contains(&self.default_cache) {
            return Err(ConfigError::UnknownDefaultCache(self.default_cache.clone()));
        }
        if self.max_entries == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    pub fn lookup_delay(&self) -> Option<Duration> {
        self.lookup_delay_ms.map(Duration::from_millis)
    }
}

/// Builder for [`BookshelfConfig`].
#[derive(Debug, Clone, Default)]
pub struct BookshelfConfigBuilder {
    config: BookshelfConfig,
}

impl BookshelfConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the region names.
    ///
    /// Default: `["default", "another"]`
    pub fn cache_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.cache_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Default: `"default"`
    pub fn default_cache(mut self, name: impl Into<String>) -> Self {
        self.config.default_cache = name.into();
        self
    }

    pub fn max_entries(mut self, max: usize) -> Self {
        self.config.max_entries = Some(max);
        self
    }

    pub fn ttl_secs(mut self, secs: u64) -> Self {
        self.config.ttl_secs = Some(secs);
        self
    }

    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.config.eviction_policy = policy;
        self
    }

    pub fn allow_absent_values(mut self, allow: bool) -> Self {
        self.config.allow_absent_values = allow;
        self
    }

    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.config.default_title = title.into();
        self
    }

    pub fn lookup_delay_ms(mut self, millis: u64) -> Self {
        self.config.lookup_delay_ms = Some(millis);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<BookshelfConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
