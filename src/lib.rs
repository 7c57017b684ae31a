//! Mini Cache - Bounded caching and per-client rate limiting
//!
//! Provides a `KeyedStore` contract with LRU, Redis and in-memory backends,
//! and a token-bucket `RateLimiter`.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod limiter;

#[cfg(test)]
mod testing;

pub use cache::{build_store, JsonStoreExt, KeyedStore, LruStore, MemoryStore, RemoteStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use key::Key;
pub use limiter::{Quota, RateLimiter};
