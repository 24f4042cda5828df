use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_departments, get_teachers};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_teachers))
        .route("/departments", get(get_departments))
}
