//! Configuration Module
//!
//! Loads cache and rate limiter settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::cache::BackendKind;
use crate::limiter::{DEFAULT_MAX_CLIENTS, DEFAULT_MAX_TOKENS, DEFAULT_REFILL_INTERVAL};

/// Cache and rate limiter configuration.
///
/// Every value can be set through an environment variable; unset variables
/// fall back to the defaults below.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which store backs the cache
    pub backend: BackendKind,
    /// Maximum number of entries in the in-memory LRU
    pub cache_capacity: usize,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    /// Deadline for each remote cache call
    pub remote_timeout: Duration,
    /// Burst size per client
    pub rate_limit_max_tokens: u32,
    /// Time after which a client's bucket is refilled
    pub rate_limit_refill_interval: Duration,
    /// Maximum number of client buckets kept at once
    pub rate_limit_max_clients: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `inmem`, `redis` or `mock` (default: inmem)
    /// - `CACHE_CAPACITY` - Maximum LRU entries (default: 100)
    /// - `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` - Remote cache address
    ///   (default: localhost:6379, no password)
    /// - `REDIS_TIMEOUT_MS` - Remote call deadline (default: 3000)
    /// - `RATE_LIMIT_MAX_TOKENS` - Burst per client (default: 50)
    /// - `RATE_LIMIT_REFILL_SECS` - Refill interval (default: 60)
    /// - `RATE_LIMIT_MAX_CLIENTS` - Tracked clients (default: 10000)
    ///
    /// A variable that is set but does not parse is an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            backend: parse_var("CACHE_BACKEND")?.unwrap_or(defaults.backend),
            cache_capacity: parse_var("CACHE_CAPACITY")?.unwrap_or(defaults.cache_capacity),
            redis_host: env::var("REDIS_HOST")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.redis_host),
            redis_port: parse_var("REDIS_PORT")?.unwrap_or(defaults.redis_port),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
            remote_timeout: parse_var("REDIS_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.remote_timeout),
            rate_limit_max_tokens: parse_var("RATE_LIMIT_MAX_TOKENS")?
                .unwrap_or(defaults.rate_limit_max_tokens),
            rate_limit_refill_interval: parse_var("RATE_LIMIT_REFILL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_refill_interval),
            rate_limit_max_clients: parse_var("RATE_LIMIT_MAX_CLIENTS")?
                .unwrap_or(defaults.rate_limit_max_clients),
        })
    }

    /// Connection settings for the remote cache.
    ///
    /// The password travels as its own field, so it may contain characters
    /// that are reserved in a URL.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.redis_host.clone(), self.redis_port),
            redis: RedisConnectionInfo {
                db: 0,
                password: self.redis_password.clone(),
                ..RedisConnectionInfo::default()
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            cache_capacity: 100,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_password: None,
            remote_timeout: Duration::from_secs(3),
            rate_limit_max_tokens: DEFAULT_MAX_TOKENS,
            rate_limit_refill_interval: DEFAULT_REFILL_INTERVAL,
            rate_limit_max_clients: DEFAULT_MAX_CLIENTS,
        }
    }
}

/// Reads and parses `name`, treating unset or empty as `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {}: '{}'", name, raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The environment is process-wide: only the defaults test touches real names.

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Inmem);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.remote_timeout, Duration::from_secs(3));
        assert_eq!(config.rate_limit_max_tokens, 50);
        assert_eq!(config.rate_limit_refill_interval, Duration::from_secs(60));
        assert_eq!(config.rate_limit_max_clients, 10_000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        for name in [
            "CACHE_BACKEND",
            "CACHE_CAPACITY",
            "REDIS_HOST",
            "REDIS_PORT",
            "REDIS_PASSWORD",
            "REDIS_TIMEOUT_MS",
            "RATE_LIMIT_MAX_TOKENS",
            "RATE_LIMIT_REFILL_SECS",
            "RATE_LIMIT_MAX_CLIENTS",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.backend, BackendKind::Inmem);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(
            config.connection_info().addr,
            ConnectionAddr::Tcp("localhost".to_string(), 6379)
        );
        assert_eq!(config.connection_info().redis.password, None);
        assert_eq!(config.rate_limit_max_tokens, 50);
    }

    #[test]
    fn test_parse_var_values() {
        env::set_var("MINI_CACHE_TEST_PORT", " 6380 ");
        let port: Option<u16> = parse_var("MINI_CACHE_TEST_PORT").unwrap();
        assert_eq!(port, Some(6380));

        env::set_var("MINI_CACHE_TEST_BACKEND", "redis");
        let backend: Option<BackendKind> = parse_var("MINI_CACHE_TEST_BACKEND").unwrap();
        assert_eq!(backend, Some(BackendKind::Redis));

        env::set_var("MINI_CACHE_TEST_EMPTY", "");
        let empty: Option<u32> = parse_var("MINI_CACHE_TEST_EMPTY").unwrap();
        assert_eq!(empty, None);
    }

    #[test]
    fn test_parse_var_malformed() {
        env::set_var("MINI_CACHE_TEST_BAD", "lots");
        let err = parse_var::<usize>("MINI_CACHE_TEST_BAD").unwrap_err();
        assert!(err.to_string().contains("MINI_CACHE_TEST_BAD"));
    }

    #[test]
    fn test_connection_info_with_password() {
        let config = Config {
            redis_host: "cache.internal".to_string(),
            redis_port: 6380,
            redis_password: Some("s3cret".to_string()),
            ..Config::default()
        };
        let info = config.connection_info();
        assert_eq!(info.addr, ConnectionAddr::Tcp("cache.internal".to_string(), 6380));
        assert_eq!(info.redis.db, 0);
        assert_eq!(info.redis.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_connection_info_keeps_reserved_characters_in_password() {
        for password in ["a#b", "x/y", "q?r", "p@ss:w%rd"] {
            let config = Config {
                redis_password: Some(password.to_string()),
                ..Config::default()
            };
            let client = redis::Client::open(config.connection_info()).unwrap();
            assert_eq!(
                client.get_connection_info().redis.password.as_deref(),
                Some(password)
            );
        }
    }
}
