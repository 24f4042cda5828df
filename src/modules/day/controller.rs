use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use timetable_core::AppError;

use crate::modules::day::model::{DayInfo, DayQuery};
use crate::modules::day::service::DayService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/day",
    params(DayQuery),
    responses(
        (status = 200, description = "Weekday and week type of the date", body = DayInfo),
        (status = 400, description = "Malformed date or group number"),
        (status = 404, description = "Group not found"),
        (status = 503, description = "Lesson store unavailable")
    ),
    tag = "Schedule"
)]
#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayInfo>, AppError> {
    let day = DayService::get_day(
        state.store.as_ref(),
        &state.schedule_config,
        query.date.as_deref(),
        query.group.as_deref(),
    )
    .await?;
    Ok(Json(day))
}
