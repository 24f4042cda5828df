//! Cache key generation and invalidation utilities.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::RedisCache;

/// Prefix for all cache keys to avoid collisions with other Redis users.
const CACHE_PREFIX: &str = "timetable";

/// Builds a cache key with the standard prefix.
fn build_key(parts: &[&str]) -> String {
    format!("{}:{}", CACHE_PREFIX, parts.join(":"))
}

/// Keys for assembled schedule views.
pub mod schedules {
    use super::*;

    /// Key for one view of one entity. `monday` is the start of the reference
    /// week; every date of that week yields the same schedule.
    pub fn view(kind: &str, entity: &str, monday: NaiveDate, add_empty_lessons: bool) -> String {
        let monday = monday.format("%Y-%m-%d").to_string();
        let padding = if add_empty_lessons { "padded" } else { "plain" };
        build_key(&["schedule", kind, entity, &monday, padding])
    }

    pub fn invalidation_pattern() -> String {
        format!("{}:schedule:*", CACHE_PREFIX)
    }
}

/// Keys for directory listings (faculties, courses, groups, teachers, rooms).
pub mod directory {
    use super::*;

    /// Key for a listing; `filters_hash` covers the window and the filter values.
    pub fn listing(name: &str, filters_hash: &str) -> String {
        build_key(&["directory", name, filters_hash])
    }

    pub fn invalidation_pattern() -> String {
        format!("{}:directory:*", CACHE_PREFIX)
    }
}

/// Generates a short, stable hash from filter parameters.
pub fn hash_filters<T: std::hash::Hash>(filters: &T) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    let mut hasher = DefaultHasher::new();
    filters.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Cache invalidation after the lesson data changes.
pub mod invalidate {
    use super::*;

    /// Drops every cached schedule and listing. Returns the number of deleted keys.
    pub async fn all(cache: Option<&RedisCache>) -> u64 {
        let Some(cache) = cache else { return 0 };

        let mut deleted = 0;
        for pattern in [
            schedules::invalidation_pattern(),
            directory::invalidation_pattern(),
        ] {
            match cache.invalidate_pattern(&pattern).await {
                Ok(count) => deleted += count,
                Err(e) => warn!(error = %e, cache.pattern = %pattern, "Failed to invalidate caches"),
            }
        }

        info!(cache.deleted = deleted, "Timetable caches invalidated");
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_key_generation() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            schedules::view("group", "344М", monday, true),
            "timetable:schedule:group:344М:2025-03-10:padded"
        );
        assert_ne!(
            schedules::view("group", "344", monday, true),
            schedules::view("group", "344", monday, false)
        );
    }

    #[test]
    fn test_patterns_cover_keys() {
        let key = directory::listing("faculties", "abc");
        let pattern = directory::invalidation_pattern();
        assert!(key.starts_with(pattern.trim_end_matches('*')));
    }

    #[test]
    fn test_hash_filters_consistency() {
        let filters = ("ФИТ", 3, "2025-03-12");
        assert_eq!(hash_filters(&filters), hash_filters(&filters));
        assert_ne!(hash_filters(&filters), hash_filters(&("ФИТ", 4, "2025-03-12")));
    }
}
