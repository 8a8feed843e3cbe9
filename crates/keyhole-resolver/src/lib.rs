//! Resolution pipeline for the Keyhole URL shortener.
//!
//! This crate provides a [`ResolverService`] that turns an original URL into
//! its short URL: cache check, store check, deterministic generation,
//! durable insert, cache write-back. Cache faults degrade to the store; only
//! storage faults fail a request.
//!
//! # Example
//!
//! ```rust
//! use keyhole_resolver::ResolverService;
//! use keyhole_storage::InMemoryStore;
//! use keyhole_cache::MokaUrlCache;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let cache = MokaUrlCache::new();
//! let resolver = ResolverService::new(store, cache, "https://example.com");
//!
//! let mapping = resolver.resolve_or_create("https://some-long-url.example/path").await?;
//! println!("Short URL: {}", mapping.short_url);
//! # Ok(())
//! # }
//! ```

pub mod resolver;
pub mod service;

pub use resolver::Resolver;
pub use service::{ResolveOutcome, ResolverService};
