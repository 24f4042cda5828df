use std::sync::Arc;

use sqlx::PgPool;
use timetable_cache::{CacheConfig, RedisCache};
use timetable_config::{CorsConfig, RateLimitConfig, ScheduleConfig};
use timetable_db::init_db_pool;
use tracing::{info, warn};

use crate::modules::schedule::store::{LessonStore, PgLessonStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub store: Arc<dyn LessonStore>,
    pub schedule_config: ScheduleConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub cache_config: CacheConfig,
    pub cache: Option<RedisCache>,
}

pub async fn init_app_state() -> AppState {
    let schedule_config = ScheduleConfig::from_env();
    let cache_config = CacheConfig::from_env();

    let db = init_db_pool(schedule_config.store_timeout).await;
    let cache = connect_cache(&cache_config).await;

    AppState {
        store: Arc::new(PgLessonStore::new(db.clone())),
        db,
        schedule_config,
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        cache_config,
        cache,
    }
}

/// Redis is optional: a missing URL or a failed connection disables caching.
async fn connect_cache(config: &CacheConfig) -> Option<RedisCache> {
    let url = config.redis_url.as_deref()?;

    match RedisCache::new(url, config.default_ttl()).await {
        Ok(cache) => {
            info!(ttl_seconds = config.default_ttl_seconds, "Redis cache enabled");
            Some(cache)
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, continuing without cache");
            None
        }
    }
}
