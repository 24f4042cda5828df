use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_lesson_types;

pub fn init_lesson_types_router() -> Router<AppState> {
    Router::new().route("/", get(get_lesson_types))
}
