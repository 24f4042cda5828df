pub use timetable_models::day::{DayInfo, DayQuery, WeekTypeSource, weekday_names};
