//! Teacher and department directory models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::ids::{DepartmentId, FacultyId};

pub use crate::schedule::TeacherInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Department {
    pub id: DepartmentId,
    pub title: String,
    pub title_short: String,
    pub faculty_id: Option<FacultyId>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct TeacherFilterParams {
    /// Empty or 0 means every faculty
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_id")]
    pub faculty_id: Option<i32>,
    /// Empty or 0 means every department
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_id")]
    pub department_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct DepartmentFilterParams {
    #[serde(default, deserialize_with = "timetable_core::serde::deserialize_optional_id")]
    pub faculty_id: Option<i32>,
}
