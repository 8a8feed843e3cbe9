use crate::error::CacheError;
use crate::mapping::UrlMapping;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// The ephemeral key-value layer in front of the durable store.
///
/// Entries are keyed by the *original* URL. The cache holds a subset of the
/// store's mappings; a miss says nothing about whether the store has one.
/// Implementations may evict or expire entries on their own policy.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the cached mapping for an original URL.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, original_url: &str) -> Result<Option<UrlMapping>>;

    /// Store a mapping, overwriting any prior value for the same key.
    async fn set(&self, mapping: &UrlMapping) -> Result<()>;
}
