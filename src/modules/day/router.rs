use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_day;

pub fn init_day_router() -> Router<AppState> {
    Router::new().route("/", get(get_day))
}
