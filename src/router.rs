use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use timetable_cache::{CacheControlConfig, cache_control, etag_middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auditoriums::{init_auditoriums_router, init_buildings_router};
use crate::modules::day::init_day_router;
use crate::modules::faculties::{init_courses_router, init_faculties_router, init_groups_router};
use crate::modules::lesson_types::init_lesson_types_router;
use crate::modules::schedule::init_schedule_router;
use crate::modules::teachers::init_teachers_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let governor = Arc::new(state.rate_limit_config.governor_config());
    let cache_headers = CacheControlConfig::public(state.cache_config.default_ttl_seconds)
        .with_stale_while_revalidate(60);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/schedule", init_schedule_router())
                .nest("/faculties", init_faculties_router())
                .nest("/courses", init_courses_router())
                .nest("/groups", init_groups_router())
                .nest("/teachers", init_teachers_router())
                .nest("/buildings", init_buildings_router())
                .nest("/auditoriums", init_auditoriums_router())
                .nest("/lesson-types", init_lesson_types_router())
                .nest("/day", init_day_router())
                .layer(middleware::from_fn(etag_middleware))
                .layer(cache_control(cache_headers))
                .layer(GovernorLayer::new(governor)),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    axum::http::header::IF_NONE_MATCH,
                ])
                .expose_headers([axum::http::header::ETAG])
        })
        .layer(middleware::from_fn(logging_middleware))
}
