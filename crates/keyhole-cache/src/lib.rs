//! Fast-Path Cache backends for the Keyhole URL shortener.
//!
//! Both backends implement [`UrlCache`], keyed by the original URL:
//! [`RedisUrlCache`] for an external shared cache and [`MokaUrlCache`] for
//! an in-process one. A cache fault never fails a request; the resolution
//! pipeline degrades to the durable store.

pub mod moka;
pub mod redis;

pub use crate::moka::{CacheConfig, MokaUrlCache};
pub use crate::redis::RedisUrlCache;
pub use keyhole_core::cache::{Result, UrlCache};
pub use keyhole_core::CacheError;
