//! Backend Selection
//!
//! Builds the configured `KeyedStore` implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::cache::{KeyedStore, LruStore, MemoryStore, RemoteStore};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Which [`KeyedStore`] backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Bounded in-process LRU
    #[default]
    Inmem,
    /// Redis pass-through
    Redis,
    /// Unbounded test double
    Mock,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inmem" => Ok(BackendKind::Inmem),
            "redis" => Ok(BackendKind::Redis),
            "mock" => Ok(BackendKind::Mock),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown cache backend '{}' (expected inmem, redis or mock)",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Inmem => "inmem",
            BackendKind::Redis => "redis",
            BackendKind::Mock => "mock",
        };
        f.write_str(name)
    }
}

// == Build Store ==
/// Constructs the byte store selected by `config.backend`.
///
/// The Redis backend connects and pings before returning, so an unreachable
/// server is reported here rather than on first use.
pub async fn build_store(config: &Config) -> Result<Arc<dyn KeyedStore<Bytes>>> {
    let store: Arc<dyn KeyedStore<Bytes>> = match config.backend {
        BackendKind::Inmem => Arc::new(LruStore::<Bytes>::new(config.cache_capacity)?),
        BackendKind::Redis => {
            Arc::new(RemoteStore::connect(config.connection_info(), config.remote_timeout).await?)
        }
        BackendKind::Mock => Arc::new(MemoryStore::<Bytes>::new()),
    };
    info!("Cache backend ready: {}", config.backend);
    Ok(store)
}
