pub mod controller;
pub mod empty_lessons;
pub mod grouping;
pub mod model;
pub mod router;
pub mod service;
pub mod store;
pub mod week_type;

pub use model::*;
pub use router::init_schedule_router;
pub use service::ScheduleService;
pub use store::{LessonStore, MemoryLessonStore, PgLessonStore};
