//! Keyed Store Module
//!
//! The get/set/remove contract every cache backend implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::key::Key;

// == Keyed Store ==
/// Backend-agnostic key-value cache.
///
/// Absence is `Ok(None)`, never an error. Only remote backends return
/// errors, and then only for transport failures or timeouts.
///
/// Dropping a returned future cancels the call. In-memory backends never
/// hold a lock across an await point, so a cancelled call leaves each entry
/// either untouched or fully written.
#[async_trait]
pub trait KeyedStore<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Returns the value last set for `key`, if still present.
    async fn get(&self, key: &Key) -> Result<Option<V>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: Key, value: V) -> Result<()>;

    /// Invalidates `key`. Returns whether an entry was present.
    async fn remove(&self, key: &Key) -> Result<bool>;
}

#[async_trait]
impl<V, S> KeyedStore<V> for Arc<S>
where
    V: Send + 'static,
    S: KeyedStore<V> + ?Sized,
{
    async fn get(&self, key: &Key) -> Result<Option<V>> {
        (**self).get(key).await
    }

    async fn set(&self, key: Key, value: V) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &Key) -> Result<bool> {
        (**self).remove(key).await
    }
}
