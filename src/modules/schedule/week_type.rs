//! Numerator/denominator resolution for the two weeks around a reference date.
//!
//! The first week is the one containing the reference date, the second is the
//! week after it. Labels found on lessons inside the window win. When the window
//! carries no labels at all, the first week is predicted from the nearest
//! labelled lesson before the window (or, failing that, after it) by week
//! parity, and a schedule with no history starts on a numerator week.

use chrono::NaiveDate;
use timetable_models::{LessonRecord, WeekType};
use tracing::{debug, warn};

use crate::utils::dates::{add_days, format_period, monday_of};

/// Resolved week types of the two-week window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekAssignment {
    pub reference_date: NaiveDate,
    pub first_week_monday: NaiveDate,
    pub first_week: WeekType,
    pub second_week: WeekType,
}

impl WeekAssignment {
    pub fn second_week_monday(&self) -> NaiveDate {
        add_days(self.first_week_monday, 7)
    }

    /// Last day of the window (Sunday of the second week).
    pub fn window_end(&self) -> NaiveDate {
        add_days(self.first_week_monday, 13)
    }

    /// Week type of the window half holding `date`; `None` outside the window.
    pub fn week_type_of(&self, date: NaiveDate) -> Option<WeekType> {
        if date < self.first_week_monday || date > self.window_end() {
            None
        } else if date < self.second_week_monday() {
            Some(self.first_week)
        } else {
            Some(self.second_week)
        }
    }

    pub fn monday_of(&self, week_type: WeekType) -> NaiveDate {
        if self.first_week == week_type {
            self.first_week_monday
        } else {
            self.second_week_monday()
        }
    }

    pub fn numerator_period(&self) -> String {
        format_period(self.monday_of(WeekType::Numerator))
    }

    pub fn denominator_period(&self) -> String {
        format_period(self.monday_of(WeekType::Denominator))
    }

    /// Week type of the week that contains the reference date.
    pub fn input_week_type(&self) -> WeekType {
        self.week_type_of(self.reference_date)
            .unwrap_or(self.first_week)
    }
}

/// Resolves both weeks of the window starting at the reference date's Monday.
///
/// `window_rows` may contain rows outside the window; they are ignored. Neighbour
/// references with an unknown label are ignored too.
pub fn resolve(
    reference_date: NaiveDate,
    window_rows: &[LessonRecord],
    nearest_before: Option<&LessonRecord>,
    nearest_after: Option<&LessonRecord>,
) -> WeekAssignment {
    let first_week_monday = monday_of(reference_date);
    let second_week_monday = add_days(first_week_monday, 7);

    let first_actual = actual_week_type(window_rows, first_week_monday);
    let second_actual = actual_week_type(window_rows, second_week_monday);

    let (first_week, second_week) = match (first_actual, second_actual) {
        (Some(first), Some(second)) if first == second => {
            warn!(
                week.monday = %first_week_monday,
                week_type = %first,
                "Both weeks of the window carry the same label, keeping the first week's"
            );
            (first, first.opposite())
        }
        (Some(first), Some(second)) => (first, second),
        (Some(first), None) => (first, first.opposite()),
        (None, Some(second)) => (second.opposite(), second),
        (None, None) => {
            let predicted = predict_first_week(first_week_monday, nearest_before, nearest_after);
            (predicted, predicted.opposite())
        }
    };

    debug!(
        reference_date = %reference_date,
        first_week.monday = %first_week_monday,
        first_week.week_type = %first_week,
        first_week.labelled = first_actual.is_some(),
        second_week.labelled = second_actual.is_some(),
        "Resolved week types"
    );

    WeekAssignment {
        reference_date,
        first_week_monday,
        first_week,
        second_week,
    }
}

/// Label of the earliest known-labelled row in the week starting at `monday`.
fn actual_week_type(rows: &[LessonRecord], monday: NaiveDate) -> Option<WeekType> {
    let sunday = add_days(monday, 6);
    let mut labelled = rows
        .iter()
        .filter(|row| row.date >= monday && row.date <= sunday)
        .filter_map(|row| row.week_type.known().map(|label| (row.date, row.id, label)))
        .collect::<Vec<_>>();
    labelled.sort_by_key(|(date, id, _)| (*date, *id));

    let (_, _, label) = *labelled.first()?;
    if labelled.iter().any(|(_, _, other)| *other != label) {
        warn!(week.monday = %monday, "Conflicting week labels inside one week");
    }
    Some(label)
}

/// Predicts the first week from the nearest labelled neighbour. The earlier
/// neighbour takes precedence; with no neighbours the first week is a numerator.
pub fn predict_first_week(
    first_week_monday: NaiveDate,
    nearest_before: Option<&LessonRecord>,
    nearest_after: Option<&LessonRecord>,
) -> WeekType {
    let known = |row: Option<&LessonRecord>| {
        row.and_then(|r| r.week_type.known().map(|label| (monday_of(r.date), label)))
    };

    if let Some((reference_monday, label)) = known(nearest_before) {
        return by_parity(label, weeks_between(reference_monday, first_week_monday));
    }

    if let Some((reference_monday, label)) = known(nearest_after) {
        return by_parity(label, weeks_between(first_week_monday, reference_monday));
    }

    WeekType::Numerator
}

/// Week type of `date` given a Monday known to start a numerator week.
pub fn week_type_from_anchor(date: NaiveDate, anchor_monday: NaiveDate) -> WeekType {
    by_parity(
        WeekType::Numerator,
        weeks_between(monday_of(anchor_monday), monday_of(date)),
    )
}

/// Whole weeks from one week start to another; negative when `to` is earlier.
fn weeks_between(from_monday: NaiveDate, to_monday: NaiveDate) -> i64 {
    (to_monday - from_monday).num_days() / 7
}

/// Even distance keeps the label, odd distance flips it.
fn by_parity(label: WeekType, weeks_apart: i64) -> WeekType {
    if weeks_apart.rem_euclid(2) == 0 {
        label
    } else {
        label.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use timetable_models::{LessonType, WeekTypeLabel, ids::LessonId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(id: i32, on: NaiveDate, label: WeekTypeLabel) -> LessonRecord {
        LessonRecord {
            id: LessonId::new(id),
            date: on,
            time: "08.10-09.45".into(),
            start_time: None,
            end_time: None,
            title: "Математика".into(),
            lesson_type: LessonType::Lecture,
            week_type: label,
            teacher_auditoriums: Vec::new(),
            group: None,
        }
    }

    // Monday 2025-03-10; second week starts 2025-03-17.
    const REF: (i32, u32, u32) = (2025, 3, 12);

    fn reference() -> NaiveDate {
        date(REF.0, REF.1, REF.2)
    }

    #[test]
    fn test_cold_start_defaults_to_numerator() {
        let assignment = resolve(reference(), &[], None, None);
        assert_eq!(assignment.first_week_monday, date(2025, 3, 10));
        assert_eq!(assignment.first_week, WeekType::Numerator);
        assert_eq!(assignment.second_week, WeekType::Denominator);
        assert_eq!(assignment.input_week_type(), WeekType::Numerator);
    }

    #[test]
    fn test_earlier_reference_even_parity_keeps_label() {
        let before = row(1, date(2025, 2, 24), WeekTypeLabel::Numerator);
        let assignment = resolve(reference(), &[], Some(&before), None);
        assert_eq!(assignment.first_week, WeekType::Numerator);
        assert_eq!(assignment.second_week, WeekType::Denominator);
    }

    #[test]
    fn test_earlier_reference_odd_parity_flips_label() {
        let before = row(1, date(2025, 3, 3), WeekTypeLabel::Numerator);
        let assignment = resolve(reference(), &[], Some(&before), None);
        assert_eq!(assignment.first_week, WeekType::Denominator);
        assert_eq!(assignment.second_week, WeekType::Numerator);
    }

    #[test]
    fn test_parity_uses_week_starts_not_day_counts() {
        // Saturday eight days before the window still sits one whole week back.
        let before = row(1, date(2025, 3, 8), WeekTypeLabel::Denominator);
        let assignment = resolve(reference(), &[], Some(&before), None);
        assert_eq!(assignment.first_week, WeekType::Numerator);
    }

    #[test]
    fn test_later_reference_used_without_earlier() {
        // Reference Monday 2025-03-31 is three weeks after the window start.
        let after = row(1, date(2025, 4, 2), WeekTypeLabel::Numerator);
        let assignment = resolve(reference(), &[], None, Some(&after));
        assert_eq!(assignment.first_week, WeekType::Denominator);

        let after = row(1, date(2025, 3, 24), WeekTypeLabel::Numerator);
        let assignment = resolve(reference(), &[], None, Some(&after));
        assert_eq!(assignment.first_week, WeekType::Numerator);
    }

    #[test]
    fn test_earlier_reference_wins_over_later() {
        let before = row(1, date(2025, 2, 24), WeekTypeLabel::Numerator);
        let after = row(2, date(2025, 4, 2), WeekTypeLabel::Numerator);
        let assignment = resolve(reference(), &[], Some(&before), Some(&after));
        assert_eq!(assignment.first_week, WeekType::Numerator);
    }

    #[test]
    fn test_unknown_reference_is_never_an_anchor() {
        let before = row(1, date(2025, 3, 3), WeekTypeLabel::Unknown);
        let after = row(2, date(2025, 3, 24), WeekTypeLabel::Denominator);
        let assignment = resolve(reference(), &[], Some(&before), Some(&after));
        assert_eq!(assignment.first_week, WeekType::Denominator);

        let assignment = resolve(reference(), &[], Some(&before), None);
        assert_eq!(assignment.first_week, WeekType::Numerator);
    }

    #[test]
    fn test_in_window_labels_override_prediction() {
        // Neighbour predicts numerator for the first week.
        let before = row(1, date(2025, 2, 24), WeekTypeLabel::Numerator);
        let window = vec![
            row(2, date(2025, 3, 11), WeekTypeLabel::Denominator),
            row(3, date(2025, 3, 18), WeekTypeLabel::Numerator),
        ];
        let assignment = resolve(reference(), &window, Some(&before), None);
        assert_eq!(assignment.first_week, WeekType::Denominator);
        assert_eq!(assignment.second_week, WeekType::Numerator);
    }

    #[test]
    fn test_second_week_label_decides_first_week() {
        let before = row(1, date(2025, 2, 24), WeekTypeLabel::Numerator);
        let window = vec![
            row(2, date(2025, 3, 11), WeekTypeLabel::Unknown),
            row(3, date(2025, 3, 18), WeekTypeLabel::Numerator),
        ];
        let assignment = resolve(reference(), &window, Some(&before), None);
        assert_eq!(assignment.first_week, WeekType::Denominator);
        assert_eq!(assignment.second_week, WeekType::Numerator);
    }

    #[test]
    fn test_conflicting_window_labels_stay_opposite() {
        let window = vec![
            row(1, date(2025, 3, 11), WeekTypeLabel::Numerator),
            row(2, date(2025, 3, 18), WeekTypeLabel::Numerator),
        ];
        let assignment = resolve(reference(), &window, None, None);
        assert_eq!(assignment.first_week, WeekType::Numerator);
        assert_eq!(assignment.second_week, WeekType::Denominator);
    }

    #[test]
    fn test_weeks_always_opposite() {
        let labels = [
            WeekTypeLabel::Numerator,
            WeekTypeLabel::Denominator,
            WeekTypeLabel::Unknown,
        ];
        for first in labels {
            for second in labels {
                for offset in 0..14 {
                    let reference = date(2025, 3, 3) + Duration::days(offset);
                    let monday = monday_of(reference);
                    let window = vec![
                        row(1, monday, first),
                        row(2, monday + Duration::days(8), second),
                    ];
                    let assignment = resolve(reference, &window, None, None);
                    assert_eq!(assignment.first_week.opposite(), assignment.second_week);
                }
            }
        }
    }

    #[test]
    fn test_rows_outside_window_are_ignored() {
        let window = vec![row(1, date(2025, 3, 24), WeekTypeLabel::Denominator)];
        let assignment = resolve(reference(), &window, None, None);
        assert_eq!(assignment.first_week, WeekType::Numerator);
    }

    #[test]
    fn test_periods_follow_assignment() {
        let window = vec![row(1, date(2025, 3, 11), WeekTypeLabel::Denominator)];
        let assignment = resolve(reference(), &window, None, None);
        assert_eq!(assignment.denominator_period(), "10.03-16.03");
        assert_eq!(assignment.numerator_period(), "17.03-23.03");
        assert_eq!(assignment.input_week_type(), WeekType::Denominator);
    }

    #[test]
    fn test_sunday_reference_belongs_to_previous_monday() {
        let assignment = resolve(date(2025, 3, 16), &[], None, None);
        assert_eq!(assignment.first_week_monday, date(2025, 3, 10));
        assert_eq!(assignment.week_type_of(date(2025, 3, 16)), Some(WeekType::Numerator));
        assert_eq!(assignment.week_type_of(date(2025, 3, 17)), Some(WeekType::Denominator));
        assert_eq!(assignment.week_type_of(date(2025, 3, 24)), None);
    }

    #[test]
    fn test_week_type_from_anchor() {
        let anchor = date(2026, 2, 9);
        assert_eq!(week_type_from_anchor(date(2026, 2, 12), anchor), WeekType::Numerator);
        assert_eq!(week_type_from_anchor(date(2026, 2, 16), anchor), WeekType::Denominator);
        assert_eq!(week_type_from_anchor(date(2026, 2, 8), anchor), WeekType::Denominator);
        assert_eq!(week_type_from_anchor(date(2026, 1, 26), anchor), WeekType::Numerator);
    }
}
