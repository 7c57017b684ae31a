//! Error types for the cache and rate limiter
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
///
/// A missing key is not an error: stores report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or too long
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Component constructed with unusable parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Remote key-value service unreachable or returned a protocol failure
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Remote call exceeded its deadline
    #[error("Backend timed out after {0:?}")]
    Timeout(Duration),

    /// Cached payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::BackendUnavailable(err.to_string())
    }
}

impl CacheError {
    /// True for failures of the remote backend (unreachable or timed out).
    ///
    /// Callers typically fall back to the source of truth on these.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            CacheError::BackendUnavailable(_) | CacheError::Timeout(_)
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
