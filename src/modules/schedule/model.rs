use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub use timetable_models::{
    AuditoriumLesson, AuditoriumSchedule, StudentLesson, StudentSchedule, TeacherLesson,
    TeacherSchedule,
};

/// Query parameters shared by every schedule view.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ScheduleQuery {
    /// Reference date, YYYY-MM-DD. Empty or absent means today.
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    #[param(example = "2025-03-12")]
    pub date: Option<String>,

    /// Pad every day with placeholders on the shared slot grid.
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_flag")]
    pub add_empty_lessons: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BatchGroupsRequest {
    /// Group numbers; unknown ones are skipped
    #[validate(length(min = 1, max = 50, message = "groups must contain between 1 and 50 entries"))]
    #[schema(example = json!(["344", "232М"]))]
    pub groups: Vec<String>,
}
