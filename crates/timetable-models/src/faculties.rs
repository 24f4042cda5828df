//! Faculty, course and group directory models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::ids::FacultyId;
use crate::value_types::GroupNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Faculty {
    pub id: FacultyId,
    /// Full faculty title
    pub title: String,
    /// Short title used in URLs and filters, e.g. "ФИТ"
    pub title_short: String,
}

/// A faculty with the courses that have lessons around the requested date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacultyCourses {
    pub faculty: Faculty,
    pub courses: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CourseFaculties {
    pub course: i32,
    pub faculties: Vec<Faculty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FacultyCourseGroups {
    pub faculty: String,
    pub course: i32,
    pub groups: Vec<GroupNumber>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct DateQuery {
    /// Reference date, YYYY-MM-DD; empty means today
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct CoursesQuery {
    /// Short faculty title
    pub faculty: String,
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct FacultiesByCourseQuery {
    pub course: i32,
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct GroupsQuery {
    /// Short faculty title
    pub faculty: String,
    pub course: i32,
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_string")]
    pub date: Option<String>,
}
