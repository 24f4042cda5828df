use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    get_auditorium_schedule, get_group_schedule, get_group_schedules, get_teacher_schedule,
};

pub fn init_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/groups/sample", post(get_group_schedules))
        .route("/groups/{group}", get(get_group_schedule))
        .route("/teachers/{id}", get(get_teacher_schedule))
        .route("/auditoriums/{id}", get(get_auditorium_schedule))
}
