//! Schedule engine settings.
//!
//! # Configuration
//!
//! - `SCHEDULE_STORE_TIMEOUT_SECS`: bound on each lesson store call (default: 10)
//! - `SCHEDULE_LISTING_MONTHS`: half-width of the window used by directory listings (default: 6)
//! - `SCHEDULE_UTC_OFFSET_HOURS`: offset of the university's clock, used for "today" (default: 3)
//! - `SCHEDULE_WEEK_ANCHOR`: a date inside a known numerator week (default: 2026-02-09)

use std::env;
use std::time::Duration;

use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub store_timeout: Duration,
    pub listing_months: u32,
    pub utc_offset_hours: i32,
    pub week_anchor: NaiveDate,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(10),
            listing_months: 6,
            utc_offset_hours: 3,
            week_anchor: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap_or_default(),
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store_timeout: env::var("SCHEDULE_STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.store_timeout),
            listing_months: env::var("SCHEDULE_LISTING_MONTHS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.listing_months),
            utc_offset_hours: env::var("SCHEDULE_UTC_OFFSET_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours: &i32| hours.abs() <= 14)
                .unwrap_or(defaults.utc_offset_hours),
            week_anchor: env::var("SCHEDULE_WEEK_ANCHOR")
                .ok()
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
                .unwrap_or(defaults.week_anchor),
        }
    }

    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }

    /// The current calendar date on the university's clock.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset()).date_naive()
    }

    /// Monday of the anchor week.
    pub fn anchor_monday(&self) -> NaiveDate {
        let offset = i64::from(self.week_anchor.weekday().num_days_from_monday());
        self.week_anchor - chrono::Duration::days(offset)
    }
}
