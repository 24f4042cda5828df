use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use timetable_core::AppError;

use crate::modules::teachers::model::{
    Department, DepartmentFilterParams, TeacherFilterParams, TeacherInfo,
};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/teachers",
    params(TeacherFilterParams),
    responses(
        (status = 200, description = "Teachers sorted by full name", body = Vec<TeacherInfo>),
        (status = 404, description = "No teachers match the filter")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    Query(filters): Query<TeacherFilterParams>,
) -> Result<Json<Vec<TeacherInfo>>, AppError> {
    let teachers = TeacherService::get_teachers(&state.db, state.cache.as_ref(), filters).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/api/v1/teachers/departments",
    params(DepartmentFilterParams),
    responses(
        (status = 200, description = "Departments", body = Vec<Department>),
        (status = 404, description = "No departments match the filter")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    Query(filters): Query<DepartmentFilterParams>,
) -> Result<Json<Vec<Department>>, AppError> {
    let departments =
        TeacherService::get_departments(&state.db, state.cache.as_ref(), filters).await?;
    Ok(Json(departments))
}
