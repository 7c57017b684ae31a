//! Cache Module
//!
//! The `KeyedStore` contract and its backends: a bounded LRU, a Redis
//! pass-through and an unbounded in-memory double.

mod backend;
mod bounded;
mod json;
mod lru;
mod memory;
mod remote;
mod stats;
mod store;


// Re-export public types
pub use backend::{build_store, BackendKind};
pub use bounded::LruStore;
pub use json::JsonStoreExt;
pub use lru::{Iter, LruMap};
pub use memory::MemoryStore;
pub use remote::{RedisClient, RemoteClient, RemoteStore};
pub use stats::CacheStats;
pub use store::KeyedStore;
