use std::sync::Arc;

use crate::resolver::{Resolver, Result};
use async_trait::async_trait;
use keyhole_core::{StorageError, UrlCache, UrlMapping, UrlStore};
use tracing::{debug, info_span, trace, warn, Instrument, Span};

/// How a single resolution terminated, recorded on the request span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The cache already held the mapping.
    CacheHit,
    /// The store held the mapping; the cache was back-filled.
    StoreHit,
    /// A new mapping was derived and persisted.
    Generated,
}

impl ResolveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveOutcome::CacheHit => "cache-hit",
            ResolveOutcome::StoreHit => "store-hit",
            ResolveOutcome::Generated => "generated",
        }
    }
}

/// A concrete implementation of the [`Resolver`] trait.
///
/// The service wraps a [`UrlStore`] and a [`UrlCache`] and owns the
/// pipeline's consistency contract:
/// - the cache is advisory: a cache fault is logged and treated as a miss,
///   never surfaced to the caller;
/// - the store is authoritative: a storage fault aborts the request, and a
///   failed insert leaves the cache untouched;
/// - an insert conflict means a concurrent request created the mapping
///   first, so the winner's row is re-fetched and returned.
///
/// No per-URL locking is performed across requests; the generator's
/// determinism makes concurrent first-writers converge on the same short
/// URL regardless of which insert wins.
#[derive(Debug, Clone)]
pub struct ResolverService<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    base_url: String,
}

impl<S: UrlStore, C: UrlCache> ResolverService<S, C> {
    /// Creates a new `ResolverService`.
    ///
    /// `base_url` is the public prefix under which short URLs are formed,
    /// e.g. `https://example.com`.
    pub fn new(store: S, cache: C, base_url: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
            base_url: base_url.into(),
        }
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Resolves the short URL for an original URL, creating the mapping on
    /// first sight. See [`Resolver::resolve_or_create`].
    pub async fn resolve_or_create(&self, original_url: &str) -> Result<UrlMapping> {
        Resolver::resolve_or_create(self, original_url).await
    }

    async fn populate_cache(&self, mapping: &UrlMapping) {
        // Best-effort: steps before this already produced a durable result.
        if let Err(e) = self.cache.set(mapping).await {
            warn!(url = %mapping.original_url, error = %e, "failed to populate cache");
        }
    }
}

#[async_trait]
impl<S: UrlStore, C: UrlCache> Resolver for ResolverService<S, C> {
    async fn resolve_or_create(&self, original_url: &str) -> Result<UrlMapping> {
        let span = info_span!(
            "resolve",
            url = %original_url,
            outcome = tracing::field::Empty,
        );

        async move {
            match self.cache.get(original_url).await {
                Ok(Some(mapping)) => {
                    Span::current().record("outcome", ResolveOutcome::CacheHit.as_str());
                    debug!(short_url = %mapping.short_url, "cache hit");
                    return Ok(mapping);
                }
                Ok(None) => trace!("cache miss"),
                Err(e) => warn!(error = %e, "cache unavailable, falling back to store"),
            }

            if let Some(mapping) = self.store.find_by_original_url(original_url).await? {
                self.populate_cache(&mapping).await;
                Span::current().record("outcome", ResolveOutcome::StoreHit.as_str());
                debug!(short_url = %mapping.short_url, "store hit");
                return Ok(mapping);
            }

            let mapping = UrlMapping::derive(original_url, &self.base_url);

            match self.store.insert(&mapping).await {
                Ok(()) => {}
                Err(StorageError::Conflict(_)) => {
                    // A concurrent request persisted this URL between our
                    // store check and insert; its row is canonical.
                    debug!("lost first-writer race, re-fetching winner");
                    let mapping = match self.store.find_by_original_url(original_url).await? {
                        Some(winner) => winner,
                        // Winner's row not visible yet; the derived mapping
                        // carries the identical short URL.
                        None => mapping,
                    };
                    self.populate_cache(&mapping).await;
                    Span::current().record("outcome", ResolveOutcome::Generated.as_str());
                    debug!(short_url = %mapping.short_url, "resolved after insert conflict");
                    return Ok(mapping);
                }
                Err(e) => return Err(e.into()),
            }

            self.populate_cache(&mapping).await;
            Span::current().record("outcome", ResolveOutcome::Generated.as_str());
            debug!(short_url = %mapping.short_url, "generated new mapping");
            Ok(mapping)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use keyhole_cache::MokaUrlCache;
    use keyhole_core::{CacheError, ShortCode};
    use keyhole_storage::InMemoryStore;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const BASE_URL: &str = "https://example.com";

    fn mapping(url: &str) -> UrlMapping {
        UrlMapping::derive(url, BASE_URL)
    }

    /// A store that fails the test if the pipeline touches it.
    struct PanickingStore;

    #[async_trait]
    impl UrlStore for PanickingStore {
        async fn find_by_original_url(
            &self,
            _original_url: &str,
        ) -> keyhole_core::store::Result<Option<UrlMapping>> {
            panic!("durable store must not be consulted");
        }

        async fn insert(&self, _mapping: &UrlMapping) -> keyhole_core::store::Result<()> {
            panic!("durable store must not be written");
        }
    }

    /// A store whose writes always fail with an outage.
    struct UnavailableStore;

    #[async_trait]
    impl UrlStore for UnavailableStore {
        async fn find_by_original_url(
            &self,
            _original_url: &str,
        ) -> keyhole_core::store::Result<Option<UrlMapping>> {
            Ok(None)
        }

        async fn insert(&self, _mapping: &UrlMapping) -> keyhole_core::store::Result<()> {
            Err(StorageError::Unavailable("connection lost".to_string()))
        }
    }

    /// An in-memory store that counts successful inserts.
    struct CountingStore {
        inner: InMemoryStore,
        inserts: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryStore::new(),
                inserts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UrlStore for CountingStore {
        async fn find_by_original_url(
            &self,
            original_url: &str,
        ) -> keyhole_core::store::Result<Option<UrlMapping>> {
            self.inner.find_by_original_url(original_url).await
        }

        async fn insert(&self, mapping: &UrlMapping) -> keyhole_core::store::Result<()> {
            self.inner.insert(mapping).await?;
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// A store that rejects every insert as a conflict and only reveals the
    /// winner's row after an insert was attempted.
    struct RacingStore {
        winner: UrlMapping,
        insert_attempted: AtomicBool,
    }

    #[async_trait]
    impl UrlStore for RacingStore {
        async fn find_by_original_url(
            &self,
            _original_url: &str,
        ) -> keyhole_core::store::Result<Option<UrlMapping>> {
            if self.insert_attempted.load(Ordering::SeqCst) {
                Ok(Some(self.winner.clone()))
            } else {
                Ok(None)
            }
        }

        async fn insert(&self, mapping: &UrlMapping) -> keyhole_core::store::Result<()> {
            self.insert_attempted.store(true, Ordering::SeqCst);
            Err(StorageError::Conflict(mapping.original_url.clone()))
        }
    }

    /// A cache whose every operation fails with an outage.
    struct FailingCache;

    #[async_trait]
    impl UrlCache for FailingCache {
        async fn get(
            &self,
            _original_url: &str,
        ) -> keyhole_core::cache::Result<Option<UrlMapping>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _mapping: &UrlMapping) -> keyhole_core::cache::Result<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn cache_hit_returns_without_touching_store() {
        let cache = MokaUrlCache::new();
        let m = mapping("https://example.org/cached");
        cache.set(&m).await.unwrap();

        let service = ResolverService::new(PanickingStore, cache, BASE_URL);

        let resolved = service
            .resolve_or_create("https://example.org/cached")
            .await
            .unwrap();
        assert_eq!(resolved, m);
    }

    #[tokio::test]
    async fn store_hit_populates_cache() {
        let store = InMemoryStore::new();
        let m = mapping("https://example.org/stored");
        store.insert(&m).await.unwrap();

        let service = ResolverService::new(store, MokaUrlCache::new(), BASE_URL);

        let resolved = service
            .resolve_or_create("https://example.org/stored")
            .await
            .unwrap();
        assert_eq!(resolved, m);

        let cached = service
            .cache()
            .get("https://example.org/stored")
            .await
            .unwrap();
        assert_eq!(cached, Some(m));
    }

    #[tokio::test]
    async fn first_write_generates_persists_and_caches() {
        let url = "https://very-long-example.com/path?query=1";
        let service = ResolverService::new(CountingStore::new(), MokaUrlCache::new(), BASE_URL);

        let resolved = service.resolve_or_create(url).await.unwrap();

        let expected_short = ShortCode::derive(url).to_url(BASE_URL);
        assert_eq!(resolved.short_url, expected_short);
        assert_eq!(resolved.original_url, url);

        let stored = service
            .store()
            .find_by_original_url(url)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.short_url, expected_short);

        let cached = service.cache().get(url).await.unwrap().unwrap();
        assert_eq!(cached.short_url, expected_short);
    }

    #[tokio::test]
    async fn repeat_calls_are_idempotent_and_insert_once() {
        let url = "https://example.org/idempotent";
        let service = ResolverService::new(CountingStore::new(), MokaUrlCache::new(), BASE_URL);

        let first = service.resolve_or_create(url).await.unwrap();
        for _ in 0..5 {
            let again = service.resolve_or_create(url).await.unwrap();
            assert_eq!(again.short_url, first.short_url);
        }

        assert_eq!(service.store().inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn insert_failure_propagates_and_leaves_cache_unmodified() {
        let url = "https://example.org/unlucky";
        let service = ResolverService::new(UnavailableStore, MokaUrlCache::new(), BASE_URL);

        let err = service.resolve_or_create(url).await.unwrap_err();
        assert!(matches!(
            err,
            keyhole_core::ResolveError::Storage(StorageError::Unavailable(_))
        ));

        let cached = service.cache().get(url).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn cache_outage_degrades_to_store_hit() {
        let store = InMemoryStore::new();
        let m = mapping("https://example.org/degraded");
        store.insert(&m).await.unwrap();

        let service = ResolverService::new(store, FailingCache, BASE_URL);

        let resolved = service
            .resolve_or_create("https://example.org/degraded")
            .await
            .unwrap();
        assert_eq!(resolved, m);
    }

    #[tokio::test]
    async fn cache_outage_does_not_block_first_write() {
        let url = "https://example.org/fresh-despite-cache";
        let service = ResolverService::new(InMemoryStore::new(), FailingCache, BASE_URL);

        let resolved = service.resolve_or_create(url).await.unwrap();
        assert_eq!(resolved.short_url, ShortCode::derive(url).to_url(BASE_URL));

        let stored = service.store().find_by_original_url(url).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn insert_conflict_returns_the_winners_row() {
        let url = "https://example.org/raced";
        let winner = UrlMapping {
            original_url: url.to_string(),
            short_url: ShortCode::derive(url).to_url(BASE_URL),
            created_at: Timestamp::UNIX_EPOCH,
        };
        let store = RacingStore {
            winner: winner.clone(),
            insert_attempted: AtomicBool::new(false),
        };

        let service = ResolverService::new(store, MokaUrlCache::new(), BASE_URL);

        let resolved = service.resolve_or_create(url).await.unwrap();
        // The winner's row, not the freshly derived one.
        assert_eq!(resolved.created_at, winner.created_at);
        assert_eq!(resolved.short_url, winner.short_url);

        let cached = service.cache().get(url).await.unwrap();
        assert_eq!(cached, Some(winner));
    }

    #[tokio::test]
    async fn concurrent_first_writers_converge() {
        let url = "https://example.org/stampede";
        let service = std::sync::Arc::new(ResolverService::new(
            CountingStore::new(),
            MokaUrlCache::new(),
            BASE_URL,
        ));

        let mut handles = vec![];
        for _ in 0..16 {
            let service = std::sync::Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.resolve_or_create(url).await.unwrap().short_url
            }));
        }

        let mut short_urls = vec![];
        for handle in handles {
            short_urls.push(handle.await.unwrap());
        }

        let expected = ShortCode::derive(url).to_url(BASE_URL);
        assert!(short_urls.iter().all(|s| *s == expected));
        assert_eq!(service.store().inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolution_is_deterministic_across_services() {
        let url = "https://example.org/deterministic";

        let a = ResolverService::new(InMemoryStore::new(), MokaUrlCache::new(), BASE_URL)
            .resolve_or_create(url)
            .await
            .unwrap();
        let b = ResolverService::new(InMemoryStore::new(), MokaUrlCache::new(), BASE_URL)
            .resolve_or_create(url)
            .await
            .unwrap();

        assert_eq!(a.short_url, b.short_url);
    }

    #[tokio::test]
    async fn empty_input_is_processed_uniformly() {
        let service = ResolverService::new(InMemoryStore::new(), MokaUrlCache::new(), BASE_URL);

        let resolved = service.resolve_or_create("").await.unwrap();
        assert_eq!(resolved.short_url, format!("{}/d41d8cd9", BASE_URL));
    }
}
