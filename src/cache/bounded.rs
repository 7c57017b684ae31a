//! Bounded Store Module
//!
//! Fixed-capacity in-memory cache with least-recently-used eviction.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheStats, KeyedStore, LruMap};
use crate::error::{CacheError, Result};
use crate::key::Key;

#[derive(Debug)]
struct Inner<V> {
    entries: LruMap<Key, V>,
    stats: CacheStats,
}

// == LRU Store ==
/// In-memory [`KeyedStore`] holding at most `capacity` entries.
///
/// The recency map and the statistics sit behind one mutex, so promotion,
/// eviction and insertion happen as a single step.
#[derive(Debug)]
pub struct LruStore<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
}

impl<V> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store. `capacity` must be at least one.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        info!("LRU store created with capacity {}", capacity);
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruMap::new(capacity),
                stats: CacheStats::new(capacity),
            }),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// Checks for `key` without refreshing its recency.
    pub async fn contains(&self, key: &Key) -> bool {
        self.inner.lock().await.entries.contains(key)
    }

    /// Drops every entry. Counters are kept.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        debug!("LRU store cleared");
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        stats
    }

    /// Keys from most to least recently used.
    pub async fn keys(&self) -> Vec<Key> {
        let inner = self.inner.lock().await;
        inner.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) async fn assert_consistent(&self) {
        self.inner.lock().await.entries.assert_consistent();
    }
}

#[async_trait]
impl<V> KeyedStore<V> for LruStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &Key) -> Result<Option<V>> {
        let mut inner = self.inner.lock().await;
        let value = inner.entries.get(key).cloned();
        inner.stats.record_lookup(value.is_some());
        Ok(value)
    }

    async fn set(&self, key: Key, value: V) -> Result<()> {
        let evicted = {
            let mut inner = self.inner.lock().await;
            let evicted = inner.entries.put(key, value).map(|(key, _)| key);
            if evicted.is_some() {
                inner.stats.record_eviction();
            }
            evicted
        };
        if let Some(evicted) = evicted {
            debug!("Evicted least recently used key {}", evicted);
        }
        Ok(())
    }

    async fn remove(&self, key: &Key) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        Ok(inner.entries.remove(key).is_some())
    }
}
