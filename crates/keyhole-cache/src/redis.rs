use async_trait::async_trait;
use keyhole_core::cache::{Result, UrlCache};
use keyhole_core::{CacheError, UrlMapping};
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

/// A Redis-based implementation of [`UrlCache`].
///
/// Mappings are stored as JSON strings keyed by the original URL under a
/// configurable key prefix. The connection is a reconnecting
/// [`redis::aio::ConnectionManager`], the process-wide shared handle.
#[derive(Clone, Debug)]
pub struct RedisUrlCache {
    conn: redis::aio::ConnectionManager,
    key_prefix: String,
}

const DEFAULT_KEY_PREFIX: &str = "kh:url:";

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    /// Creates a new Redis URL cache over an existing connection manager.
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Creates a new Redis URL cache with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::ConnectionManager,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Creates a cache by opening a managed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            CacheError::Initialization(format!("invalid redis url '{redis_url}': {e}"))
        })?;
        let conn = client.get_connection_manager().await.map_err(|e| {
            CacheError::Initialization(format!("failed to connect to redis: {e}"))
        })?;
        Ok(Self::new(conn))
    }

    /// Generates the cache key for an original URL.
    fn cache_key(&self, original_url: &str) -> String {
        format!("{}{}", self.key_prefix, original_url)
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get(&self, original_url: &str) -> Result<Option<UrlMapping>> {
        let key = self.cache_key(original_url);
        trace!(url = %original_url, "Fetching mapping from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(cached)) => {
                debug!(url = %original_url, "Cache hit in Redis");
                match serde_json::from_str::<UrlMapping>(&cached) {
                    Ok(mapping) => Ok(Some(mapping)),
                    Err(e) => {
                        warn!(url = %original_url, error = %e, "Failed to deserialize cached mapping");
                        Err(CacheError::InvalidData(format!(
                            "invalid cached value for key '{key}': {e}"
                        )))
                    }
                }
            }
            Ok(None) => {
                trace!(url = %original_url, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(url = %original_url, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, mapping: &UrlMapping) -> Result<()> {
        let key = self.cache_key(&mapping.original_url);
        trace!(url = %mapping.original_url, "Storing mapping in Redis cache");

        let json = match serde_json::to_string(mapping) {
            Ok(json) => json,
            Err(e) => {
                warn!(url = %mapping.original_url, error = %e, "Failed to serialize mapping for caching");
                return Err(CacheError::Serialization(format!(
                    "failed to serialize cache value: {e}"
                )));
            }
        };

        let mut conn = self.conn.clone();
        match conn.set::<_, _, ()>(&key, json).await {
            Ok(()) => {
                debug!(url = %mapping.original_url, "Cached mapping in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(url = %mapping.original_url, error = %e, "Failed to cache mapping in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
