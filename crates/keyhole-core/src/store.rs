use crate::error::StorageError;
use crate::mapping::UrlMapping;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// The durable, authoritative record of original-to-short URL mappings.
///
/// Implementations assign the surrogate `id` internally on insert and keep
/// it out of the returned records.
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Retrieves the mapping stored for exactly this original URL
    /// (byte-for-byte match). Absence is a normal result, never an error.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlMapping>>;

    /// Appends a new mapping. Returns `Err(Conflict)` if a mapping for the
    /// same original URL already exists.
    async fn insert(&self, mapping: &UrlMapping) -> Result<()>;
}
