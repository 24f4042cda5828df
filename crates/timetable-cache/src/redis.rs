//! Redis cache client.
//!
//! Values are stored as JSON strings with a TTL. Read failures degrade to a
//! cache miss, so a Redis outage slows requests down without failing them.

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Redis cache client with connection pooling.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RedisCache {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or Redis is unreachable.
    pub async fn new(redis_url: &str, default_ttl: Duration) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, default_ttl })
    }

    /// Gets a cached value by key.
    ///
    /// Returns `None` if the key doesn't exist, Redis fails, or deserialization fails.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!(cache.key = %key, "Cache hit");
                match serde_json::from_str(&value) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        error!(cache.key = %key, error = %e, "Failed to deserialize cached value");
                        None
                    }
                }
            }
            Ok(None) => {
                debug!(cache.key = %key, "Cache miss");
                None
            }
            Err(e) => {
                error!(cache.key = %key, error = %e, "Redis GET error");
                None
            }
        }
    }

    /// Sets a cached value with the default TTL.
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Sets a cached value with a custom TTL.
    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set_with_ttl<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(value)?;

        conn.set_ex::<_, _, ()>(key, json, ttl.as_secs().max(1)).await?;

        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");

        Ok(())
    }

    /// Deletes every key matching a pattern, using SCAN so Redis is never blocked.
    #[instrument(skip(self), fields(cache.operation = "SCAN_DEL"))]
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let count: u64 = conn.del(&keys).await?;
                deleted += count;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(cache.pattern = %pattern, cache.deleted = %deleted, "Pattern invalidation complete");

        Ok(deleted)
    }
}

/// Read-through caching: returns the cached value for `key`, or runs `build`
/// and stores its successful result. Errors from `build` are never cached.
pub async fn cached<T, E, F, Fut>(cache: Option<&RedisCache>, key: &str, build: F) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(cache) = cache
        && let Some(value) = cache.get::<T>(key).await
    {
        return Ok(value);
    }

    let value = build().await?;

    if let Some(cache) = cache
        && let Err(e) = cache.set(key, &value).await
    {
        warn!(cache.key = %key, error = %e, "Failed to cache value");
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: i32,
        name: String,
    }

    #[tokio::test]
    async fn test_cached_without_cache_runs_builder() {
        let value: Result<TestData, String> = cached(None, "timetable:test", || async {
            Ok(TestData {
                id: 1,
                name: "a".into(),
            })
        })
        .await;
        assert_eq!(value.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_cached_propagates_builder_error() {
        let value: Result<TestData, String> =
            cached(None, "timetable:test", || async { Err("boom".to_string()) }).await;
        assert_eq!(value.unwrap_err(), "boom");
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_set_and_get() {
        let cache = RedisCache::new("redis://localhost:6379", Duration::from_secs(60))
            .await
            .unwrap();

        let data = TestData {
            id: 1,
            name: "test".to_string(),
        };

        cache.set("timetable:test:key", &data).await.unwrap();

        let retrieved: Option<TestData> = cache.get("timetable:test:key").await;
        assert_eq!(retrieved, Some(data));

        cache.invalidate_pattern("timetable:test:*").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_cached_reads_through() {
        let cache = RedisCache::new("redis://localhost:6379", Duration::from_secs(60))
            .await
            .unwrap();
        let key = "timetable:test:read-through";
        cache.invalidate_pattern(key).await.unwrap();

        let first: Result<i32, String> = cached(Some(&cache), key, || async { Ok(1) }).await;
        let second: Result<i32, String> = cached(Some(&cache), key, || async { Ok(2) }).await;
        assert_eq!(first.unwrap(), 1);
        assert_eq!(second.unwrap(), 1);

        cache.invalidate_pattern(key).await.unwrap();
    }
}
