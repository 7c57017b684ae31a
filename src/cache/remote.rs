//! Remote Store Module
//!
//! Pass-through store fronting an external key-value service (Redis).

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, IntoConnectionInfo};
use tracing::{info, warn};

use crate::cache::KeyedStore;
use crate::error::{CacheError, Result};
use crate::key::Key;

// == Remote Client ==
/// Minimal command set the remote store needs from a key-value service.
///
/// A missing key is `Ok(None)`; anything else that goes wrong on the wire
/// is an error.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Returns whether the key existed.
    async fn del(&self, key: &str) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

// == Redis Client ==
/// [`RemoteClient`] over a multiplexed Redis connection.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    conn: MultiplexedConnection,
}

impl RedisClient {
    /// Opens a multiplexed connection.
    ///
    /// `info` is a [`redis::ConnectionInfo`] or a `redis://` URL.
    pub async fn connect<T: IntoConnectionInfo>(info: T) -> Result<Self> {
        let client = redis::Client::open(info)
            .map_err(|err| CacheError::InvalidConfig(format!("redis connection: {}", err)))?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RemoteClient for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

// == Remote Store ==
/// [`KeyedStore`] delegating every call to a [`RemoteClient`].
///
/// Each call is bounded by `timeout`; an overrun becomes
/// [`CacheError::Timeout`] rather than a hang. Failures are logged and
/// returned unchanged, never retried and never reported as a miss.
pub struct RemoteStore<C> {
    client: C,
    timeout: Duration,
}

impl<C: RemoteClient> RemoteStore<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Health probe against the remote service.
    pub async fn ping(&self) -> Result<()> {
        self.bounded("PING", self.client.ping()).await
    }

    async fn bounded<T, F>(&self, command: &str, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!("Remote {} failed: {}", command, err);
                Err(err)
            }
            Err(_) => {
                warn!("Remote {} timed out after {:?}", command, self.timeout);
                Err(CacheError::Timeout(self.timeout))
            }
        }
    }
}

impl RemoteStore<RedisClient> {
    /// Connects to Redis and verifies the connection with `PING`.
    pub async fn connect<T: IntoConnectionInfo>(info: T, timeout: Duration) -> Result<Self> {
        let client = match tokio::time::timeout(timeout, RedisClient::connect(info)).await {
            Ok(client) => client?,
            Err(_) => return Err(CacheError::Timeout(timeout)),
        };
        let store = Self::new(client, timeout);
        store.ping().await?;
        info!("Connected to remote cache");
        Ok(store)
    }
}

#[async_trait]
impl<C: RemoteClient> KeyedStore<Bytes> for RemoteStore<C> {
    async fn get(&self, key: &Key) -> Result<Option<Bytes>> {
        self.bounded("GET", self.client.get(key.as_str())).await
    }

    async fn set(&self, key: Key, value: Bytes) -> Result<()> {
        self.bounded("SET", self.client.set(key.as_str(), &value)).await
    }

    async fn remove(&self, key: &Key) -> Result<bool> {
        self.bounded("DEL", self.client.del(key.as_str())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Scripted stand-in for a Redis server.
    #[derive(Default)]
    struct FakeClient {
        data: Mutex<HashMap<String, Bytes>>,
        down: AtomicBool,
        stall: AtomicBool,
    }

    impl FakeClient {
        async fn check(&self) -> Result<()> {
            if self.stall.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.down.load(Ordering::SeqCst) {
                return Err(CacheError::BackendUnavailable(
                    "connection refused".to_string(),
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteClient for FakeClient {
        async fn get(&self, key: &str) -> Result<Option<Bytes>> {
            self.check().await?;
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            self.check().await?;
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), Bytes::copy_from_slice(value));
            Ok(())
        }

        async fn del(&self, key: &str) -> Result<bool> {
            self.check().await?;
            Ok(self.data.lock().unwrap().remove(key).is_some())
        }

        async fn ping(&self) -> Result<()> {
            self.check().await
        }
    }

    fn key(s: &str) -> Key {
        Key::new(s).unwrap()
    }

    fn store() -> RemoteStore<FakeClient> {
        RemoteStore::new(FakeClient::default(), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_remote_roundtrip() {
        let store = store();

        store
            .set(key("todos:list"), Bytes::from_static(b"[]"))
            .await
            .unwrap();
        assert_eq!(
            store.get(&key("todos:list")).await.unwrap(),
            Some(Bytes::from_static(b"[]"))
        );
        assert!(store.remove(&key("todos:list")).await.unwrap());
        assert_eq!(store.get(&key("todos:list")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remote_absence_is_not_an_error() {
        let store = store();
        assert_eq!(store.get(&key("missing")).await.unwrap(), None);
        assert!(!store.remove(&key("missing")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remote_failure_is_surfaced() {
        let store = store();
        store.client.down.store(true, Ordering::SeqCst);

        let err = store.get(&key("todos:list")).await.unwrap_err();
        assert!(matches!(err, CacheError::BackendUnavailable(_)));
        assert!(store.ping().await.is_err());
        assert!(store
            .set(key("todos:list"), Bytes::new())
            .await
            .unwrap_err()
            .is_backend());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_stall_times_out() {
        let store = store();
        store.client.stall.store(true, Ordering::SeqCst);

        let err = store.get(&key("todos:list")).await.unwrap_err();
        assert!(matches!(err, CacheError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_redis_connect_rejects_bad_url() {
        let result = RedisClient::connect("not-a-redis-url").await;
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_redis_connect_unreachable() {
        let result = RemoteStore::connect("redis://127.0.0.1:1", Duration::from_secs(2)).await;
        let err = result.err().expect("connection should fail");
        assert!(err.is_backend());
    }
}
