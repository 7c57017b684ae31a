//! Memory Store Module
//!
//! Unbounded in-memory store for exercising caller logic in tests.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::KeyedStore;
use crate::error::Result;
use crate::key::Key;

// == Memory Store ==
/// Deterministic [`KeyedStore`] with no capacity limit and no eviction.
///
/// Stands in for a remote cache when testing cache-aside callers.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: DashMap<Key, V>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> KeyedStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &Key) -> Result<Option<V>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: Key, value: V) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &Key) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}
