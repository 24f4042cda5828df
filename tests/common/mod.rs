#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use timetable::router::init_router;
use timetable::state::AppState;
use timetable_cache::CacheConfig;
use timetable_config::{CorsConfig, RateLimitConfig, ScheduleConfig};
use timetable_models::auditoriums::{Auditorium, Building};
use timetable_models::ids::{AuditoriumId, BuildingId, LessonId, TeacherId};
use timetable_models::{
    GroupInfo, GroupNumber, LessonRecord, LessonType, TeacherAuditorium, TeacherInfo,
    WeekTypeLabel,
};
use tower::ServiceExt;

use timetable::modules::schedule::MemoryLessonStore;

pub const GROUP: &str = "344";
pub const TEACHER_ID: i32 = 1;
pub const AUDITORIUM_ID: i32 = 7;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn teacher() -> TeacherInfo {
    TeacherInfo {
        id: TeacherId::new(TEACHER_ID),
        full_name: "Иванов Иван Иванович".into(),
        short_name: "Иванов И.И.".into(),
        link: None,
    }
}

pub fn auditorium() -> Auditorium {
    Auditorium::new(
        AuditoriumId::new(AUDITORIUM_ID),
        "305",
        Some(Building {
            id: BuildingId::new(1),
            title: "Главный корпус".into(),
            letter: "А".into(),
        }),
    )
}

pub fn group() -> GroupInfo {
    GroupInfo {
        number: GroupNumber::new(GROUP).unwrap(),
        course: 3,
        faculty: "ФИТ".into(),
    }
}

pub fn lesson(
    id: i32,
    day: NaiveDate,
    time: &str,
    title: &str,
    label: WeekTypeLabel,
) -> LessonRecord {
    LessonRecord {
        id: LessonId::new(id),
        date: day,
        time: time.into(),
        start_time: None,
        end_time: None,
        title: title.into(),
        lesson_type: LessonType::Lecture,
        week_type: label,
        teacher_auditoriums: vec![TeacherAuditorium {
            teacher: Some(teacher()),
            auditorium: Some(auditorium()),
        }],
        group: Some(group()),
    }
}

/// Two weeks of lessons for group 344 starting Monday 2025-03-10.
///
/// The first week is labelled numerator. The only lesson of the second week
/// has no label.
pub fn fixture_store() -> MemoryLessonStore {
    MemoryLessonStore::new().with_lessons([
        lesson(1, date(2025, 3, 11), "08.10-09.45", "Физика", WeekTypeLabel::Numerator),
        lesson(2, date(2025, 3, 11), "11.40-13.15", "Математика", WeekTypeLabel::Numerator),
        lesson(3, date(2025, 3, 12), "09.55-11.30", "Химия", WeekTypeLabel::Numerator),
        lesson(4, date(2025, 3, 18), "08.10-09.45", "Физика", WeekTypeLabel::Unknown),
    ])
}

pub fn test_state(store: MemoryLessonStore) -> AppState {
    dotenvy::dotenv().ok();

    // Directory endpoints are not exercised here, so the pool never connects.
    let db = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://localhost/timetable_test")
        .unwrap();

    AppState {
        db,
        store: Arc::new(store),
        schedule_config: ScheduleConfig {
            store_timeout: Duration::from_millis(200),
            ..ScheduleConfig::default()
        },
        cors_config: CorsConfig::from_list("http://localhost:3000"),
        rate_limit_config: RateLimitConfig::default(),
        cache_config: CacheConfig::default(),
        cache: None,
    }
}

pub fn setup_test_app(store: MemoryLessonStore) -> axum::Router {
    init_router(test_state(store))
}

/// Builds a request carrying the peer address the rate limiter keys on.
pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &axum::Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
