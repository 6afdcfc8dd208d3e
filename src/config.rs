//! Configuration Module
//!
//! Construction parameters for a cache, loadable from environment variables.

use std::env;
use std::time::Duration;

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Defaults ==
const DEFAULT_MAX_SIZE: usize = 1000;
const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

// == Expiration Policy ==
/// Which timestamp a TTL is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationPolicy {
    /// Fixed lifetime measured from insertion.
    #[default]
    Absolute,
    /// Lifetime measured from the last read or write.
    Sliding,
}

impl ExpirationPolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "absolute" => Some(Self::Absolute),
            "sliding" => Some(Self::Sliding),
            _ => None,
        }
    }
}

/// Cache configuration parameters.
///
/// Immutable once handed to a cache. `ttl` of `None` (or zero) means entries
/// never expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of live entries
    pub max_size: usize,
    /// Entry lifetime, None = no expiration
    pub ttl: Option<Duration>,
    /// Timestamp the TTL is measured from
    pub expiration: ExpirationPolicy,
    /// Background sweep frequency
    pub sweep_interval: Duration,
}

impl CacheConfig {
    /// Creates a config with the given capacity and no expiration.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ttl: None,
            expiration: ExpirationPolicy::Absolute,
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_expiration(mut self, expiration: ExpirationPolicy) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    // == Validate ==
    /// Checks the configuration and normalises a zero TTL to "never expires".
    pub fn validate(mut self) -> Result<Self> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be a positive integer".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be greater than zero".to_string(),
            ));
        }
        if self.ttl.is_some_and(|ttl| ttl.is_zero()) {
            self.ttl = None;
        }
        Ok(self)
    }

    /// Returns the TTL in milliseconds, if any.
    ///
    /// Sub-millisecond TTLs round up to 1; TTLs beyond `u64::MAX` ms saturate.
    pub fn ttl_ms(&self) -> Option<u64> {
        self.ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum live entries (default: 1000)
    /// - `CACHE_TTL_MS` - Entry lifetime in milliseconds (default: unset, 0 = no expiry)
    /// - `CACHE_TTL_MODE` - `absolute` or `sliding` (default: absolute)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Background sweep frequency (default: 1000)
    ///
    /// The result is not validated; pass it through [`CacheConfig::validate`]
    /// or a cache constructor.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_u64 = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            max_size: lookup("CACHE_MAX_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_SIZE),
            ttl: parse_u64("CACHE_TTL_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            expiration: lookup("CACHE_TTL_MODE")
                .and_then(|v| ExpirationPolicy::parse(&v))
                .unwrap_or_default(),
            sweep_interval: Duration::from_millis(
                parse_u64("CACHE_SWEEP_INTERVAL_MS").unwrap_or(DEFAULT_SWEEP_INTERVAL_MS),
            ),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}
