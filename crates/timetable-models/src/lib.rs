//! # Timetable Models
//!
//! Domain models and DTOs for the Timetable API.
//!
//! # Modules
//!
//! - [`ids`]: integer ID newtypes
//! - [`value_types`]: validated primitives such as [`GroupNumber`]
//! - [`schedule`]: lesson records, slots, week grids and schedule views
//! - [`faculties`], [`teachers`], [`auditoriums`]: directory listings
//! - [`day`]: weekday and week type of a date

pub mod auditoriums;
pub mod day;
pub mod faculties;
pub mod ids;
pub mod schedule;
pub mod teachers;
pub mod value_types;

pub use schedule::{
    AuditoriumLesson, AuditoriumSchedule, EMPTY_LESSON_TEXT, EntityProfile, EntitySelector,
    GroupInfo, LessonRecord, LessonSlot, LessonType, LessonTypeInfo, NumeratorDenominator,
    ScheduleGrid, StudentLesson, StudentSchedule, TeacherAuditorium, TeacherInfo, TeacherLesson,
    TeacherSchedule, Week, WeekType, WeekTypeLabel, Weekday,
};
pub use value_types::GroupNumber;
