//! Redis cache configuration.

use std::env;
use std::time::Duration;

/// Redis cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL; caching is disabled when unset
/// - `CACHE_TTL_SECONDS`: TTL for cached schedules and listings (default: `300`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Redis connection URL. `None` disables caching.
    pub redis_url: Option<String>,

    /// Default time-to-live for cached items in seconds.
    pub default_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    pub fn is_enabled(&self) -> bool {
        self.redis_url.is_some()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl_seconds: 300,
        }
    }
}
