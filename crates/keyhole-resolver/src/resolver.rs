use async_trait::async_trait;
use keyhole_core::{ResolveError, UrlMapping};

pub type Result<T> = std::result::Result<T, ResolveError>;

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves the short URL for an original URL, creating and persisting
    /// the mapping on first sight of the input.
    async fn resolve_or_create(&self, original_url: &str) -> Result<UrlMapping>;
}
