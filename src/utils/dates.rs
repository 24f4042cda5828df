//! Calendar helpers: week starts, query windows and reference date parsing.

use chrono::{Datelike, Days, Months, NaiveDate};
use timetable_core::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days from the Monday of a window to its last Sunday.
const WINDOW_LAST_DAY: u64 = 13;

/// `date + days`, clamped to the last date chrono can represent.
pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Monday of the week containing `date`. Sunday belongs to the week that started six days earlier.
///
/// Clamps to the first representable date when that Monday does not exist.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN)
}

/// The two-week schedule window: Monday of the reference week through Monday + 13.
///
/// `None` when the window, or the day before it, falls outside the calendar.
pub fn checked_schedule_window(reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let monday = reference.checked_sub_days(Days::new(u64::from(
        reference.weekday().num_days_from_monday(),
    )))?;
    monday.pred_opt()?;
    let end = monday.checked_add_days(Days::new(WINDOW_LAST_DAY))?;
    Some((monday, end))
}

/// [`checked_schedule_window`] as a bad request when the window does not fit.
pub fn schedule_window(reference: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
    checked_schedule_window(reference).ok_or_else(out_of_range)
}

fn out_of_range() -> AppError {
    AppError::bad_request(anyhow::anyhow!("date is outside the supported range"))
}

/// Existence-style window for directory listings: `reference ± months`.
///
/// Month arithmetic clamps to the last day of shorter months; on overflow the
/// reference date itself is used as the bound.
pub fn listing_window(reference: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let span = Months::new(months);
    (
        reference.checked_sub_months(span).unwrap_or(reference),
        reference.checked_add_months(span).unwrap_or(reference),
    )
}

/// Parses a `YYYY-MM-DD` reference date. `None` means today.
///
/// Dates whose schedule window does not fit in the calendar are rejected.
pub fn parse_reference_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let date = match raw.map(str::trim) {
        None | Some("") => today,
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
            AppError::bad_request(anyhow::anyhow!("invalid date format, expected YYYY-MM-DD"))
        })?,
    };
    schedule_window(date)?;
    Ok(date)
}

/// `DD.MM-DD.MM` label of the week starting at `monday`, through Monday + 6.
pub fn format_period(monday: NaiveDate) -> String {
    let sunday = add_days(monday, 6);
    format!("{}-{}", monday.format("%d.%m"), sunday.format("%d.%m"))
}
