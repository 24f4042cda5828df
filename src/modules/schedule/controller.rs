use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use timetable_core::AppError;
use timetable_models::ids::{AuditoriumId, TeacherId};

use crate::modules::schedule::model::{
    AuditoriumSchedule, BatchGroupsRequest, ScheduleQuery, StudentSchedule, TeacherSchedule,
};
use crate::modules::schedule::service::ScheduleService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/v1/schedule/groups/{group}",
    params(
        ("group" = String, Path, description = "Group number, e.g. 344 or 232М"),
        ScheduleQuery
    ),
    responses(
        (status = 200, description = "Two-week schedule of the group", body = StudentSchedule),
        (status = 400, description = "Malformed date or group number"),
        (status = 404, description = "Group not found"),
        (status = 503, description = "Lesson store unavailable")
    ),
    tag = "Schedule"
)]
#[instrument(skip(state))]
pub async fn get_group_schedule(
    State(state): State<AppState>,
    Path(group): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<StudentSchedule>, AppError> {
    let schedule = ScheduleService::get_group_schedule(
        state.store.as_ref(),
        state.cache.as_ref(),
        &state.schedule_config,
        &group,
        query.date.as_deref(),
        query.add_empty_lessons,
    )
    .await?;

    Ok(Json(schedule))
}

#[utoipa::path(
    post,
    path = "/api/v1/schedule/groups/sample",
    params(ScheduleQuery),
    request_body = BatchGroupsRequest,
    responses(
        (status = 200, description = "Schedules of the known groups, in request order", body = Vec<StudentSchedule>),
        (status = 400, description = "Malformed date, group number or request body"),
        (status = 404, description = "None of the groups were found"),
        (status = 503, description = "Lesson store unavailable")
    ),
    tag = "Schedule"
)]
#[instrument(skip(state))]
pub async fn get_group_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
    ValidatedJson(request): ValidatedJson<BatchGroupsRequest>,
) -> Result<Json<Vec<StudentSchedule>>, AppError> {
    let schedules = ScheduleService::get_group_schedules(
        state.store.as_ref(),
        state.cache.as_ref(),
        &state.schedule_config,
        request,
        query.date.as_deref(),
        query.add_empty_lessons,
    )
    .await?;

    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/v1/schedule/teachers/{id}",
    params(
        ("id" = i32, Path, description = "Teacher ID"),
        ScheduleQuery
    ),
    responses(
        (status = 200, description = "Two-week schedule of the teacher", body = TeacherSchedule),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Teacher not found"),
        (status = 503, description = "Lesson store unavailable")
    ),
    tag = "Schedule"
)]
#[instrument(skip(state))]
pub async fn get_teacher_schedule(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<TeacherSchedule>, AppError> {
    let schedule = ScheduleService::get_teacher_schedule(
        state.store.as_ref(),
        state.cache.as_ref(),
        &state.schedule_config,
        TeacherId::new(id),
        query.date.as_deref(),
        query.add_empty_lessons,
    )
    .await?;

    Ok(Json(schedule))
}

#[utoipa::path(
    get,
    path = "/api/v1/schedule/auditoriums/{id}",
    params(
        ("id" = i32, Path, description = "Auditorium ID"),
        ScheduleQuery
    ),
    responses(
        (status = 200, description = "Two-week occupancy of the auditorium", body = AuditoriumSchedule),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Auditorium not found"),
        (status = 503, description = "Lesson store unavailable")
    ),
    tag = "Schedule"
)]
#[instrument(skip(state))]
pub async fn get_auditorium_schedule(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<AuditoriumSchedule>, AppError> {
    let schedule = ScheduleService::get_auditorium_schedule(
        state.store.as_ref(),
        state.cache.as_ref(),
        &state.schedule_config,
        AuditoriumId::new(id),
        query.date.as_deref(),
        query.add_empty_lessons,
    )
    .await?;

    Ok(Json(schedule))
}
