//! Turns lesson rows into the numerator/denominator grid.
//!
//! Rows describing the same lesson (same week, date, slot, title and type) are
//! merged into one [`LessonSlot`]. This happens when a lesson is taught by
//! several teachers or in several rooms, or when several groups attend it. The
//! merged participants are deduplicated and sorted so the output does not
//! depend on row order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use timetable_models::{
    LessonRecord, LessonSlot, LessonType, ScheduleGrid, TeacherAuditorium, WeekType, Weekday,
    auditoriums::Auditorium, ids::LessonId, schedule::TeacherInfo,
    value_types::{GroupNumber, compare_group_numbers},
};
use tracing::debug;

use super::week_type::WeekAssignment;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SlotKey {
    week_type: WeekType,
    date: NaiveDate,
    time: String,
    title: String,
    lesson_type: LessonType,
}

#[derive(Debug)]
struct SlotBuilder {
    weekday: Weekday,
    first_lesson_id: LessonId,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    teacher_auditoriums: Vec<TeacherAuditorium>,
    groups: Vec<GroupNumber>,
    faculties: Vec<String>,
    courses: Vec<i32>,
}

impl SlotBuilder {
    fn new(first_lesson_id: LessonId, weekday: Weekday) -> Self {
        Self {
            weekday,
            first_lesson_id,
            start_time: None,
            end_time: None,
            teacher_auditoriums: Vec::new(),
            groups: Vec::new(),
            faculties: Vec::new(),
            courses: Vec::new(),
        }
    }

    fn absorb(&mut self, row: &LessonRecord) {
        self.first_lesson_id = self.first_lesson_id.min(row.id);
        self.start_time = earliest(self.start_time, row.start_time);
        self.end_time = latest(self.end_time, row.end_time);
        self.teacher_auditoriums.extend(
            row.teacher_auditoriums
                .iter()
                .filter(|pair| !pair.is_empty())
                .cloned(),
        );
        if let Some(group) = &row.group {
            self.groups.push(group.number.clone());
            self.faculties.push(group.faculty.clone());
            self.courses.push(group.course);
        }
    }

    fn finish(mut self, key: SlotKey) -> (WeekType, Weekday, LessonSlot) {
        self.teacher_auditoriums.sort_by(TeacherAuditorium::cmp_display);
        self.teacher_auditoriums.dedup();

        let mut teachers: Vec<TeacherInfo> = self
            .teacher_auditoriums
            .iter()
            .filter_map(|pair| pair.teacher.clone())
            .collect();
        teachers.sort_by(|a, b| (&a.short_name, a.id).cmp(&(&b.short_name, b.id)));
        teachers.dedup();

        let mut auditoriums: Vec<Auditorium> = self
            .teacher_auditoriums
            .iter()
            .filter_map(|pair| pair.auditorium.clone())
            .collect();
        auditoriums.sort_by(|a, b| (&a.display_name, a.id).cmp(&(&b.display_name, b.id)));
        auditoriums.dedup();

        self.groups.sort_by(compare_group_numbers);
        self.groups.dedup();
        self.faculties.sort();
        self.faculties.dedup();
        self.courses.sort_unstable();
        self.courses.dedup();

        let lesson = format_lesson_text(key.lesson_type, &key.title, &self.teacher_auditoriums);
        let slot = LessonSlot {
            time: key.time,
            lesson,
            title: key.title,
            lesson_type: Some(key.lesson_type),
            date: Some(key.date),
            start_time: self.start_time,
            end_time: self.end_time,
            teacher_auditoriums: self.teacher_auditoriums,
            teachers,
            auditoriums,
            groups: self.groups,
            faculties: self.faculties,
            courses: self.courses,
            first_lesson_id: Some(self.first_lesson_id),
        };

        (key.week_type, self.weekday, slot)
    }
}

fn earliest(a: Option<NaiveTime>, b: Option<NaiveTime>) -> Option<NaiveTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn latest(a: Option<NaiveTime>, b: Option<NaiveTime>) -> Option<NaiveTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Buckets rows into the grid. Every weekday of both weeks is present, possibly empty.
///
/// A row with a known label goes to that week; an unknown row goes to the week
/// type of the window half holding its date. Sunday rows and rows outside the
/// window are dropped.
pub fn group_lessons(rows: &[LessonRecord], assignment: &WeekAssignment) -> ScheduleGrid {
    let mut merged: BTreeMap<SlotKey, SlotBuilder> = BTreeMap::new();

    for row in rows {
        let Some(weekday) = row.weekday() else {
            debug!(lesson.id = %row.id, date = %row.date, "Skipping Sunday lesson");
            continue;
        };
        let Some(window_week) = assignment.week_type_of(row.date) else {
            debug!(lesson.id = %row.id, date = %row.date, "Skipping lesson outside the window");
            continue;
        };

        let key = SlotKey {
            week_type: row.week_type.known().unwrap_or(window_week),
            date: row.date,
            time: row.time.clone(),
            title: row.title.clone(),
            lesson_type: row.lesson_type,
        };

        merged
            .entry(key)
            .or_insert_with(|| SlotBuilder::new(row.id, weekday))
            .absorb(row);
    }

    let mut grid = ScheduleGrid::default();
    for (key, builder) in merged {
        let (week_type, weekday, slot) = builder.finish(key);
        grid.week_mut(week_type).day_mut(weekday).push(slot);
    }

    for week_type in WeekType::ALL {
        let week = grid.week_mut(week_type);
        for weekday in Weekday::ALL {
            week.day_mut(weekday)
                .sort_by(|a, b| (&a.time, a.first_lesson_id).cmp(&(&b.time, b.first_lesson_id)));
        }
    }

    grid
}

/// Display text of a lesson: type abbreviation, title, then one line per
/// teacher/auditorium pair.
pub fn format_lesson_text(
    lesson_type: LessonType,
    title: &str,
    teacher_auditoriums: &[TeacherAuditorium],
) -> String {
    let abbreviation = lesson_type.abbreviation();
    let participants = teacher_auditoriums
        .iter()
        .map(TeacherAuditorium::label)
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match (abbreviation.is_empty(), participants.is_empty()) {
        (false, false) => format!("{} {},\n{}", abbreviation, title, participants),
        (false, true) => format!("{} {}", abbreviation, title),
        (true, false) => format!("{},\n{}", title, participants),
        (true, true) => title.to_string(),
    }
}

/// Distinct, sorted slot labels of real lessons across both weeks.
pub fn lessons_times(grid: &ScheduleGrid) -> Vec<String> {
    WeekType::ALL
        .into_iter()
        .flat_map(|week_type| grid.week(week_type).days())
        .flat_map(|(_, lessons)| lessons.iter())
        .filter(|slot| !slot.is_placeholder())
        .map(|slot| slot.time.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
