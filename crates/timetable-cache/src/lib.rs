//! # Timetable Cache
//!
//! Redis-based caching utilities for the Timetable API.
//!
//! - Redis connection management and JSON-encoded get/set
//! - [`cached`]: read-through helper used by the services
//! - Cache configuration from environment variables
//! - Cache key builders for schedules and directory listings
//! - HTTP caching middleware (ETag, Cache-Control)
//!
//! # Example
//!
//! ```ignore
//! use timetable_cache::{CacheConfig, RedisCache, cached, keys};
//!
//! let config = CacheConfig::from_env();
//! let cache = match config.redis_url.as_deref() {
//!     Some(url) => RedisCache::new(url, config.default_ttl()).await.ok(),
//!     None => None,
//! };
//!
//! let key = keys::schedules::view("group", "344", monday, false);
//! let schedule = cached(cache.as_ref(), &key, || build_schedule()).await?;
//! ```

pub mod config;
pub mod keys;
pub mod middleware;
pub mod redis;

pub use config::CacheConfig;
pub use keys::{hash_filters, invalidate};
pub use middleware::{CacheControlConfig, cache_control, etag_middleware};
pub use redis::{CacheError, RedisCache, cached};
