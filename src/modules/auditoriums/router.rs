use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_auditorium, get_auditoriums, get_building, get_buildings};

pub fn init_buildings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_buildings))
        .route("/{id}", get(get_building))
}

pub fn init_auditoriums_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_auditoriums))
        .route("/{id}", get(get_auditorium))
}
