//! Rate limiting configuration for API endpoints.
//!
//! Every schedule request fans out into several lesson store queries, so the
//! API is guarded by a per-IP token bucket (Governor crate).
//!
//! # Configuration
//!
//! - `RATE_LIMIT_PER_SECOND`: tokens replenished per second (default: 10)
//! - `RATE_LIMIT_BURST`: bucket size (default: 50)
//!
//! # Example
//!
//! ```ignore
//! use timetable_config::RateLimitConfig;
//!
//! let config = RateLimitConfig::from_env();
//! let governor = config.governor_config();
//! ```

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Per-IP token bucket settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per second.
    pub per_second: u64,

    /// Maximum number of tokens that can accumulate,
    /// allowing short bursts above the per-second rate.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 10,
            burst_size: 50,
        }
    }
}

impl RateLimitConfig {
    /// Loads the limits from the environment, falling back to the defaults
    /// when a variable is missing or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.per_second),
            burst_size: std::env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.burst_size),
        }
    }

    /// Creates a `GovernorConfig` keyed by the peer IP address.
    ///
    /// # Panics
    ///
    /// Panics if the governor rejects the values. `from_env` never produces zeros,
    /// so this only happens with a hand-built config.
    #[must_use]
    pub fn governor_config(
        &self,
    ) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.per_second)
            .burst_size(self.burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("Failed to build rate limiter config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.per_second, 10);
        assert_eq!(config.burst_size, 50);
    }

    #[test]
    fn test_governor_config_builds() {
        let _ = RateLimitConfig::default().governor_config();
    }
}
