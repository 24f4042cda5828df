use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_courses, get_faculties, get_faculties_by_course, get_faculties_with_courses, get_groups,
};

pub fn init_faculties_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_faculties))
        .route("/courses", get(get_faculties_with_courses))
        .route("/by-course", get(get_faculties_by_course))
}

pub fn init_courses_router() -> Router<AppState> {
    Router::new().route("/", get(get_courses))
}

pub fn init_groups_router() -> Router<AppState> {
    Router::new().route("/", get(get_groups))
}
