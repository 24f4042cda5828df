//! Day information: which weekday and which alternating week a date falls in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::schedule::WeekType;

/// Where the week type of a [`DayInfo`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeekTypeSource {
    /// Parity against the configured numerator anchor week
    Anchor,
    /// Resolved from the group's own lessons
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayInfo {
    pub date: NaiveDate,
    /// English weekday, lowercase; includes "sunday"
    pub day: String,
    pub day_ru: String,
    pub week_type: WeekType,
    pub week_type_ru: String,
    pub source: WeekTypeSource,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct DayQuery {
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    pub date: Option<String>,
    /// Resolve the week type against this group's lessons
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    pub group: Option<String>,
}

/// Lowercase English and Russian names of a weekday.
pub fn weekday_names(weekday: chrono::Weekday) -> (&'static str, &'static str) {
    match weekday {
        chrono::Weekday::Mon => ("monday", "понедельник"),
        chrono::Weekday::Tue => ("tuesday", "вторник"),
        chrono::Weekday::Wed => ("wednesday", "среда"),
        chrono::Weekday::Thu => ("thursday", "четверг"),
        chrono::Weekday::Fri => ("friday", "пятница"),
        chrono::Weekday::Sat => ("saturday", "суббота"),
        chrono::Weekday::Sun => ("sunday", "воскресенье"),
    }
}
