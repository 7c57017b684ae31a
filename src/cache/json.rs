//! JSON Helpers
//!
//! Typed get/set over byte stores for cache-aside callers.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::KeyedStore;
use crate::error::Result;
use crate::key::Key;

// == JSON Store Extension ==
/// Serializes values to JSON before they reach a `KeyedStore<Bytes>`.
///
/// Lets one byte store hold heterogeneous payloads such as a single record
/// under `todos:<id>` and a list under `todos:list`.
#[async_trait]
pub trait JsonStoreExt: KeyedStore<Bytes> {
    /// Fetches and decodes `key`.
    ///
    /// A payload that does not decode as `T` is a `Serialization` error;
    /// callers usually treat it like a miss.
    async fn get_json<T>(&self, key: &Key) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T>(&self, key: Key, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, Bytes::from(bytes)).await
    }
}

impl<S: KeyedStore<Bytes> + ?Sized> JsonStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LruStore, MemoryStore};
    use crate::error::CacheError;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Todo {
        id: u64,
        title: String,
        completed: bool,
    }

    fn key(s: &str) -> Key {
        Key::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_json_roundtrip_through_lru() {
        let store: LruStore<Bytes> = LruStore::new(8).unwrap();
        let todo = Todo {
            id: 1,
            title: "write tests".to_string(),
            completed: false,
        };

        store.set_json(key("todos:1"), &todo).await.unwrap();
        let cached: Option<Todo> = store.get_json(&key("todos:1")).await.unwrap();
        assert_eq!(cached, Some(todo));
    }

    #[tokio::test]
    async fn test_json_missing_key() {
        let store: MemoryStore<Bytes> = MemoryStore::new();
        let cached: Option<Vec<Todo>> = store.get_json(&key("todos:list")).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_json_undecodable_payload() {
        let store: MemoryStore<Bytes> = MemoryStore::new();
        store
            .set(key("todos:1"), Bytes::from_static(b"not json"))
            .await
            .unwrap();

        let result = store.get_json::<Todo>(&key("todos:1")).await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_json_through_trait_object() {
        let store: Box<dyn KeyedStore<Bytes>> = Box::new(MemoryStore::new());
        store.set_json(key("todos:list"), &[1u64, 2, 3]).await.unwrap();

        let ids: Option<Vec<u64>> = store.get_json(&key("todos:list")).await.unwrap();
        assert_eq!(ids, Some(vec![1, 2, 3]));
    }
}
