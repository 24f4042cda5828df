use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use timetable_core::AppError;

use crate::modules::faculties::model::{
    CourseFaculties, CoursesQuery, DateQuery, FacultiesByCourseQuery, Faculty,
    FacultyCourseGroups, FacultyCourses, GroupsQuery,
};
use crate::modules::faculties::service::FacultyService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/faculties",
    responses(
        (status = 200, description = "Faculties that have groups", body = Vec<Faculty>),
        (status = 404, description = "No faculties")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_faculties(State(state): State<AppState>) -> Result<Json<Vec<Faculty>>, AppError> {
    let faculties = FacultyService::get_faculties(&state.db, state.cache.as_ref()).await?;
    Ok(Json(faculties))
}

#[utoipa::path(
    get,
    path = "/api/v1/faculties/courses",
    params(DateQuery),
    responses(
        (status = 200, description = "Faculties with the courses that have lessons around the date", body = Vec<FacultyCourses>),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "No faculties with lessons")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_faculties_with_courses(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<FacultyCourses>>, AppError> {
    let faculties = FacultyService::get_faculties_with_courses(
        &state.db,
        state.cache.as_ref(),
        &state.schedule_config,
        query.date.as_deref(),
    )
    .await?;
    Ok(Json(faculties))
}

#[utoipa::path(
    get,
    path = "/api/v1/faculties/by-course",
    params(FacultiesByCourseQuery),
    responses(
        (status = 200, description = "Faculties with groups of the course", body = CourseFaculties),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "No faculties for the course")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_faculties_by_course(
    State(state): State<AppState>,
    Query(query): Query<FacultiesByCourseQuery>,
) -> Result<Json<CourseFaculties>, AppError> {
    let faculties = FacultyService::get_faculties_by_course(
        &state.db,
        state.cache.as_ref(),
        &state.schedule_config,
        query.course,
        query.date.as_deref(),
    )
    .await?;
    Ok(Json(faculties))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CoursesQuery),
    responses(
        (status = 200, description = "Courses of the faculty with lessons around the date", body = Vec<i32>),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "No courses for the faculty")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(query): Query<CoursesQuery>,
) -> Result<Json<Vec<i32>>, AppError> {
    let courses = FacultyService::get_courses(
        &state.db,
        state.cache.as_ref(),
        &state.schedule_config,
        &query.faculty,
        query.date.as_deref(),
    )
    .await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups",
    params(GroupsQuery),
    responses(
        (status = 200, description = "Groups of the faculty and course", body = FacultyCourseGroups),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "No groups for the faculty and course")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_groups(
    State(state): State<AppState>,
    Query(query): Query<GroupsQuery>,
) -> Result<Json<FacultyCourseGroups>, AppError> {
    let groups = FacultyService::get_groups(
        &state.db,
        state.cache.as_ref(),
        &state.schedule_config,
        &query.faculty,
        query.course,
        query.date.as_deref(),
    )
    .await?;
    Ok(Json(groups))
}
