//! Limiter Module
//!
//! Token-bucket rate limiting keyed by client identifier.

mod bucket;
mod rate_limiter;

pub use bucket::{Quota, TokenBucket, DEFAULT_MAX_TOKENS, DEFAULT_REFILL_INTERVAL};
pub use rate_limiter::{RateLimiter, DEFAULT_MAX_CLIENTS};
