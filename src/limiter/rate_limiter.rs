//! Rate Limiter Module
//!
//! Per-client token buckets kept in a bounded recency table.

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::LruMap;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::key::Key;
use crate::limiter::{Quota, TokenBucket};

/// Default number of clients tracked at once
pub const DEFAULT_MAX_CLIENTS: usize = 10_000;

// == Rate Limiter ==
/// Decides whether a client may make a request right now.
///
/// Buckets are created full on a client's first request. The table holds at
/// most `max_clients` buckets; when full, the bucket of the client seen least
/// recently is dropped, and that client starts over with a full bucket if it
/// returns.
#[derive(Debug)]
pub struct RateLimiter {
    quota: Quota,
    buckets: Mutex<LruMap<Key, TokenBucket>>,
    max_clients: usize,
}

impl RateLimiter {
    // == Constructor ==
    pub fn new(quota: Quota, max_clients: usize) -> Result<Self> {
        if max_clients == 0 {
            return Err(CacheError::InvalidConfig(
                "rate limiter must track at least 1 client".to_string(),
            ));
        }
        info!(
            "Rate limiter created: max_tokens={}, refill_interval={:?}, max_clients={}",
            quota.max_tokens, quota.refill_interval, max_clients
        );
        Ok(Self {
            quota,
            buckets: Mutex::new(LruMap::new(max_clients)),
            max_clients,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let quota = Quota::new(
            config.rate_limit_max_tokens,
            config.rate_limit_refill_interval,
        )?;
        Self::new(quota, config.rate_limit_max_clients)
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    // == Allow ==
    /// Spends one of `client`'s tokens, returning false if none are left.
    ///
    /// Never waits: a denied request is for the caller to reject.
    pub async fn allow(&self, client: &Key) -> bool {
        self.allow_at(client, Instant::now()).await
    }

    /// [`RateLimiter::allow`] evaluated at an explicit instant.
    pub async fn allow_at(&self, client: &Key, now: Instant) -> bool {
        let (allowed, evicted) = {
            let mut buckets = self.buckets.lock().await;
            let outcome = match buckets.get_mut(client) {
                Some(bucket) => (bucket.try_acquire(&self.quota, now), None),
                None => {
                    let mut bucket = TokenBucket::full(&self.quota, now);
                    let allowed = bucket.try_acquire(&self.quota, now);
                    let evicted = buckets.put(client.clone(), bucket).map(|(key, _)| key);
                    (allowed, evicted)
                }
            };
            outcome
        };

        // Logged after the table lock is released
        if let Some(evicted) = evicted {
            debug!("Dropped rate limit bucket for idle client {}", evicted);
        }
        if !allowed {
            debug!("Rate limit exceeded for client {}", client);
        }
        allowed
    }

    /// Tokens `client` could spend right now, without consuming any.
    ///
    /// An unknown client reports a full bucket.
    pub async fn remaining(&self, client: &Key) -> u32 {
        self.remaining_at(client, Instant::now()).await
    }

    /// [`RateLimiter::remaining`] evaluated at an explicit instant.
    pub async fn remaining_at(&self, client: &Key, now: Instant) -> u32 {
        let buckets = self.buckets.lock().await;
        match buckets.peek(client) {
            Some(bucket) => bucket.available(&self.quota, now),
            None => self.quota.max_tokens,
        }
    }

    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Forgets every client.
    pub async fn clear(&self) {
        self.buckets.lock().await.clear();
    }
}
