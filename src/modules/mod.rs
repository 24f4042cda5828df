pub mod auditoriums;
pub mod day;
pub mod faculties;
pub mod lesson_types;
pub mod schedule;
pub mod teachers;
