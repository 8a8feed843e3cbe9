use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use keyhole_core::store::{Result, UrlStore};
use keyhole_core::{StorageError, UrlMapping};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory storage row; `id` mirrors the surrogate key a SQL backend
/// would assign and stays private to this layer.
#[derive(Debug, Clone)]
struct Row {
    #[allow(dead_code)]
    id: i64,
    mapping: UrlMapping,
}

/// In-memory implementation of the store using DashMap.
///
/// DashMap's sharded locks let concurrent requests read and write different
/// buckets without blocking each other; the entry API makes the
/// one-row-per-original-URL check atomic.
#[derive(Debug)]
pub struct InMemoryStore {
    rows: DashMap<String, Row>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlStore for InMemoryStore {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlMapping>> {
        Ok(self
            .rows
            .get(original_url)
            .map(|row| row.mapping.clone()))
    }

    async fn insert(&self, mapping: &UrlMapping) -> Result<()> {
        match self.rows.entry(mapping.original_url.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(mapping.original_url.clone())),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                slot.insert(Row {
                    id,
                    mapping: mapping.clone(),
                });
                Ok(())
            }
        }
    }
}
