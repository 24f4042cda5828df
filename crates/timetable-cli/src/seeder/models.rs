//! Data structures for seeding configuration and generated rows.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};

/// Time slots lessons are generated into, in day order.
pub const LESSON_SLOTS: [(&str, (u32, u32), (u32, u32)); 6] = [
    ("08.10-09.45", (8, 10), (9, 45)),
    ("09.55-11.30", (9, 55), (11, 30)),
    ("11.40-13.15", (11, 40), (13, 15)),
    ("13.45-15.20", (13, 45), (15, 20)),
    ("15.30-17.05", (15, 30), (17, 5)),
    ("17.15-18.50", (17, 15), (18, 50)),
];

/// Configuration for a full seeding run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub faculties: usize,
    pub departments_per_faculty: usize,
    pub teachers: usize,
    pub buildings: usize,
    pub auditoriums_per_building: usize,
    pub courses: u8,
    /// Capped at 9 so group numbers stay unique.
    pub groups_per_course: u8,
    pub weeks: usize,
    /// Monday of the first generated week. The first week is a numerator week.
    pub start_monday: NaiveDate,
    /// Share of lessons written without a week label, between 0 and 1.
    pub unknown_ratio: f64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            faculties: 4,
            departments_per_faculty: 3,
            teachers: 60,
            buildings: 3,
            auditoriums_per_building: 20,
            courses: 4,
            groups_per_course: 3,
            weeks: 8,
            start_monday: monday_of(today) - Duration::weeks(2),
            unknown_ratio: 0.2,
        }
    }
}

impl SeedConfig {
    pub fn total_groups(&self) -> usize {
        self.faculties * self.courses as usize * self.groups_per_course as usize
    }
}

/// Rolls any date back to the Monday of its week.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[derive(Debug, Clone)]
pub struct FacultySeed {
    pub title: String,
    pub title_short: String,
}

#[derive(Debug, Clone)]
pub struct DepartmentSeed {
    pub title: String,
    pub title_short: String,
    pub faculty_idx: usize,
}

#[derive(Debug, Clone)]
pub struct TeacherSeed {
    pub full_name: String,
    pub short_name: String,
    pub department_idx: usize,
}

#[derive(Debug, Clone)]
pub struct BuildingSeed {
    pub title: String,
    pub letter: String,
}

#[derive(Debug, Clone)]
pub struct AuditoriumSeed {
    pub number: String,
    pub building_idx: usize,
}

#[derive(Debug, Clone)]
pub struct GroupSeed {
    pub number: String,
    pub course: i32,
    pub faculty_idx: usize,
}

#[derive(Debug, Clone)]
pub struct LessonSeed {
    pub group_idx: usize,
    pub date: NaiveDate,
    pub time: &'static str,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub title: String,
    pub lesson_type: &'static str,
    pub week_type: &'static str,
    pub teacher_idx: usize,
    pub auditorium_idx: usize,
}

/// Ids of the directory rows inserted by a run, in generation order.
#[derive(Debug, Default)]
pub struct DirectoryIds {
    pub faculties: Vec<i32>,
    pub departments: Vec<i32>,
    pub teachers: Vec<i32>,
    pub buildings: Vec<i32>,
    pub auditoriums: Vec<i32>,
    pub groups: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_of() {
        let sunday = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(monday_of(sunday), NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
        let monday = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        assert_eq!(monday_of(monday), monday);
    }

    #[test]
    fn test_default_config_starts_on_monday() {
        let config = SeedConfig::default();
        assert_eq!(config.start_monday.weekday(), chrono::Weekday::Mon);
        assert_eq!(config.total_groups(), 48);
    }

    #[test]
    fn test_lesson_slots_are_ordered() {
        for pair in LESSON_SLOTS.windows(2) {
            assert!(pair[0].2 < pair[1].1);
        }
    }
}
