use async_trait::async_trait;
use keyhole_core::cache::{Result, UrlCache};
use keyhole_core::UrlMapping;
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// An in-memory cache implementation using Moka.
///
/// Suitable for single-node deployments where an external cache service is
/// not configured. Capacity and expiry are this layer's own policy; the
/// resolution pipeline treats eviction like any other miss.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, UrlMapping>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with default settings.
    ///
    /// The cache will have a default maximum capacity of 10,000 entries.
    pub fn new() -> Self {
        let cache = Cache::builder().max_capacity(10_000).build();
        Self { cache }
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a new Moka URL cache whose entries expire after `ttl` from
    /// the time of insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Creates a new Moka URL cache whose entries expire when not accessed
    /// for `tti`.
    pub fn with_tti(max_capacity: u64, tti: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(tti)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get(&self, original_url: &str) -> Result<Option<UrlMapping>> {
        trace!(url = %original_url, "Fetching mapping from Moka cache");

        match self.cache.get(original_url).await {
            Some(mapping) => {
                debug!(url = %original_url, "Cache hit in Moka");
                Ok(Some(mapping))
            }
            None => {
                trace!(url = %original_url, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, mapping: &UrlMapping) -> Result<()> {
        trace!(url = %mapping.original_url, "Storing mapping in Moka cache");

        self.cache
            .insert(mapping.original_url.clone(), mapping.clone())
            .await;
        debug!(url = %mapping.original_url, "Cached mapping in Moka");
        Ok(())
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}
