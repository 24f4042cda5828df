use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use tracing::instrument;

use timetable_config::ScheduleConfig;
use timetable_core::AppError;
use timetable_models::{EntitySelector, GroupNumber, WeekType};

use crate::modules::schedule::store::LessonStore;
use crate::modules::schedule::week_type::week_type_from_anchor;
use crate::modules::schedule::ScheduleService;
use crate::utils::dates::parse_reference_date;

use super::model::{DayInfo, WeekTypeSource, weekday_names};

pub struct DayService;

impl DayService {
    /// Weekday and week type of a date. With a group, the week type comes from
    /// that group's lessons; otherwise from the configured anchor week.
    #[instrument(skip(store, config))]
    pub async fn get_day(
        store: &dyn LessonStore,
        config: &ScheduleConfig,
        date: Option<&str>,
        group: Option<&str>,
    ) -> Result<DayInfo, AppError> {
        let date = parse_reference_date(date, config.today())?;

        let (week_type, source) = match group {
            Some(raw) => {
                let number = GroupNumber::new(raw).map_err(|e| AppError::bad_request(anyhow!(e)))?;
                let resolved = ScheduleService::resolve_schedule(
                    store,
                    config,
                    &EntitySelector::Group(number),
                    date,
                    false,
                )
                .await?;
                (resolved.assignment.input_week_type(), WeekTypeSource::Group)
            }
            None => (
                week_type_from_anchor(date, config.anchor_monday()),
                WeekTypeSource::Anchor,
            ),
        };

        Ok(day_info(date, week_type, source))
    }
}

fn day_info(date: NaiveDate, week_type: WeekType, source: WeekTypeSource) -> DayInfo {
    let (day, day_ru) = weekday_names(date.weekday());
    DayInfo {
        date,
        day: day.to_string(),
        day_ru: day_ru.to_string(),
        week_type,
        week_type_ru: week_type.title_ru().to_string(),
        source,
    }
}
