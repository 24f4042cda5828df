pub use timetable_models::{LessonType, LessonTypeInfo};
