use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use timetable_core::AppError;
use timetable_models::ids::{AuditoriumId, BuildingId};

use crate::modules::auditoriums::model::{Auditorium, AuditoriumFilterParams, Building};
use crate::modules::auditoriums::service::AuditoriumService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/buildings",
    responses(
        (status = 200, description = "All buildings", body = Vec<Building>),
        (status = 404, description = "No buildings")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_buildings(State(state): State<AppState>) -> Result<Json<Vec<Building>>, AppError> {
    let buildings = AuditoriumService::get_buildings(&state.db, state.cache.as_ref()).await?;
    Ok(Json(buildings))
}

#[utoipa::path(
    get,
    path = "/api/v1/buildings/{id}",
    params(("id" = i32, Path, description = "Building ID")),
    responses(
        (status = 200, description = "Building", body = Building),
        (status = 404, description = "Building not found")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_building(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Building>, AppError> {
    let building = AuditoriumService::get_building(&state.db, BuildingId::new(id)).await?;
    Ok(Json(building))
}

#[utoipa::path(
    get,
    path = "/api/v1/auditoriums",
    params(AuditoriumFilterParams),
    responses(
        (status = 200, description = "Auditoriums sorted by building and number", body = Vec<Auditorium>),
        (status = 404, description = "No auditoriums match the filter")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_auditoriums(
    State(state): State<AppState>,
    Query(filters): Query<AuditoriumFilterParams>,
) -> Result<Json<Vec<Auditorium>>, AppError> {
    let auditoriums =
        AuditoriumService::get_auditoriums(&state.db, state.cache.as_ref(), filters).await?;
    Ok(Json(auditoriums))
}

#[utoipa::path(
    get,
    path = "/api/v1/auditoriums/{id}",
    params(("id" = i32, Path, description = "Auditorium ID")),
    responses(
        (status = 200, description = "Auditorium with its building", body = Auditorium),
        (status = 404, description = "Auditorium not found")
    ),
    tag = "Directory"
)]
#[instrument(skip(state))]
pub async fn get_auditorium(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Auditorium>, AppError> {
    let auditorium = AuditoriumService::get_auditorium(&state.db, AuditoriumId::new(id)).await?;
    Ok(Json(auditorium))
}
