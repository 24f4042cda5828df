//! Pads days with "no lesson" placeholders on a shared slot grid.
//!
//! Placeholders are inserted for every canonical slot a day does not use, then
//! the trailing run of placeholders is cut off: a day that ends early shows
//! nothing after its last lesson, while leading slots and gaps between lessons
//! stay visible.

use timetable_models::{LessonSlot, ScheduleGrid, WeekType, Weekday};

/// Pads one day against `canonical_times`. An empty canonical set leaves the day untouched.
pub fn fill_empty_lessons(mut day: Vec<LessonSlot>, canonical_times: &[String]) -> Vec<LessonSlot> {
    if canonical_times.is_empty() {
        return day;
    }

    let missing: Vec<LessonSlot> = canonical_times
        .iter()
        .filter(|time| !day.iter().any(|slot| &slot.time == *time))
        .map(|time| LessonSlot::placeholder(time.as_str()))
        .collect();
    day.extend(missing);

    // Stable, so lessons sharing a slot keep their order.
    day.sort_by(|a, b| a.time.cmp(&b.time));

    while day.last().is_some_and(LessonSlot::is_placeholder) {
        day.pop();
    }

    day
}

/// Pads every day of both weeks against the same canonical slots.
pub fn fill_schedule(grid: &mut ScheduleGrid, canonical_times: &[String]) {
    for week_type in WeekType::ALL {
        let week = grid.week_mut(week_type);
        for weekday in Weekday::ALL {
            let day = std::mem::take(week.day_mut(weekday));
            *week.day_mut(weekday) = fill_empty_lessons(day, canonical_times);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetable_models::{EMPTY_LESSON_TEXT, ids::LessonId};

    const SLOTS: [&str; 3] = ["08.10-09.45", "09.55-11.30", "11.40-13.15"];

    fn canonical() -> Vec<String> {
        SLOTS.iter().map(|s| s.to_string()).collect()
    }

    fn lesson(id: i32, time: &str) -> LessonSlot {
        LessonSlot {
            time: time.into(),
            lesson: format!("Лек. Урок {}", id),
            title: format!("Урок {}", id),
            first_lesson_id: Some(LessonId::new(id)),
            ..LessonSlot::default()
        }
    }

    fn times(day: &[LessonSlot]) -> Vec<(&str, bool)> {
        day.iter()
            .map(|slot| (slot.time.as_str(), slot.is_placeholder()))
            .collect()
    }

    #[test]
    fn test_no_canonical_times_is_noop() {
        let day = vec![lesson(1, "11.40-13.15")];
        assert_eq!(fill_empty_lessons(day.clone(), &[]), day);
    }

    #[test]
    fn test_trailing_placeholders_are_trimmed() {
        let padded = fill_empty_lessons(vec![lesson(1, "08.10-09.45")], &canonical());
        assert_eq!(times(&padded), vec![("08.10-09.45", false)]);
    }

    #[test]
    fn test_gap_between_lessons_is_kept() {
        let day = vec![lesson(1, "08.10-09.45"), lesson(2, "11.40-13.15")];
        let padded = fill_empty_lessons(day, &canonical());
        assert_eq!(
            times(&padded),
            vec![
                ("08.10-09.45", false),
                ("09.55-11.30", true),
                ("11.40-13.15", false)
            ]
        );
        assert_eq!(padded[1].lesson, EMPTY_LESSON_TEXT);
        assert!(padded[1].teacher_auditoriums.is_empty());
    }

    #[test]
    fn test_leading_placeholders_are_kept() {
        let padded = fill_empty_lessons(vec![lesson(1, "09.55-11.30")], &canonical());
        assert_eq!(
            times(&padded),
            vec![("08.10-09.45", true), ("09.55-11.30", false)]
        );
    }

    #[test]
    fn test_middle_slot_only_pads_before_and_trims_after() {
        let mut four = canonical();
        four.push("13.45-15.20".into());
        let day = vec![lesson(1, "09.55-11.30")];
        let padded = fill_empty_lessons(day, &four);
        assert_eq!(
            times(&padded),
            vec![("08.10-09.45", true), ("09.55-11.30", false)]
        );
    }

    #[test]
    fn test_empty_day_stays_empty() {
        assert!(fill_empty_lessons(Vec::new(), &canonical()).is_empty());
    }

    #[test]
    fn test_shared_slot_keeps_both_lessons() {
        let day = vec![lesson(1, "11.40-13.15"), lesson(2, "11.40-13.15")];
        let padded = fill_empty_lessons(day, &canonical());
        assert_eq!(
            times(&padded),
            vec![
                ("08.10-09.45", true),
                ("09.55-11.30", true),
                ("11.40-13.15", false),
                ("11.40-13.15", false)
            ]
        );
        assert_eq!(padded[2].first_lesson_id, Some(LessonId::new(1)));
    }

    #[test]
    fn test_fill_schedule_pads_every_day() {
        let mut grid = ScheduleGrid::default();
        grid.numerator.monday.push(lesson(1, "09.55-11.30"));
        grid.denominator.friday.push(lesson(2, "11.40-13.15"));

        fill_schedule(&mut grid, &canonical());

        assert_eq!(grid.numerator.monday.len(), 2);
        assert_eq!(grid.denominator.friday.len(), 3);
        assert!(grid.numerator.tuesday.is_empty());
    }
}
