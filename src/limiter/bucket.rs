//! Token Bucket Module
//!
//! Per-client quota with full refill after a fixed interval.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{CacheError, Result};

/// Default burst size
pub const DEFAULT_MAX_TOKENS: u32 = 50;

/// Default time after which a bucket is refilled
pub const DEFAULT_REFILL_INTERVAL: Duration = Duration::from_secs(60);

// == Quota ==
/// Burst capacity and refill interval shared by every bucket of a limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub max_tokens: u32,
    pub refill_interval: Duration,
}

impl Quota {
    pub fn new(max_tokens: u32, refill_interval: Duration) -> Result<Self> {
        if max_tokens == 0 {
            return Err(CacheError::InvalidConfig(
                "rate limit max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_tokens,
            refill_interval,
        })
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            refill_interval: DEFAULT_REFILL_INTERVAL,
        }
    }
}

// == Token Bucket ==
/// Remaining tokens for one client and the instant of its last refill.
///
/// Once more than `refill_interval` has passed since the last refill the
/// bucket is reset to full, however many intervals went by. Spending a token
/// does not move the refill clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBucket {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    /// A bucket holding the full burst, refilled at `now`.
    pub fn full(quota: &Quota, now: Instant) -> Self {
        Self {
            tokens: quota.max_tokens,
            last_refill: now,
        }
    }

    /// Refills if due, then spends one token if any are left.
    pub fn try_acquire(&mut self, quota: &Quota, now: Instant) -> bool {
        if self.refill_due(quota, now) {
            self.tokens = quota.max_tokens;
            self.last_refill = now;
        }

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens a request at `now` could draw on, without spending any.
    pub fn available(&self, quota: &Quota, now: Instant) -> u32 {
        if self.refill_due(quota, now) {
            quota.max_tokens
        } else {
            self.tokens
        }
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn last_refill(&self) -> Instant {
        self.last_refill
    }

    fn refill_due(&self, quota: &Quota, now: Instant) -> bool {
        now.saturating_duration_since(self.last_refill) > quota.refill_interval
    }
}
