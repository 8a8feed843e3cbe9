//! Core types and traits for the Keyhole URL shortener.
//!
//! This crate provides the shared data model, the deterministic short-code
//! generator, the error taxonomy, and the storage/cache traits used by the
//! resolution pipeline and the gateway.

pub mod cache;
pub mod error;
pub mod mapping;
pub mod shortcode;
pub mod store;

pub use cache::UrlCache;
pub use error::{CacheError, CoreError, ResolveError, StorageError};
pub use mapping::UrlMapping;
pub use shortcode::ShortCode;
pub use store::UrlStore;
