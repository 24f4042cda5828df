use std::collections::HashSet;

use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{Instrument, debug, instrument};

use timetable_cache::{RedisCache, cached, keys};
use timetable_config::ScheduleConfig;
use timetable_core::AppError;
use timetable_models::{
    AuditoriumLesson, AuditoriumSchedule, EntityProfile, EntitySelector, GroupNumber,
    ScheduleGrid, StudentLesson, StudentSchedule, TeacherLesson, TeacherSchedule,
    ids::{AuditoriumId, TeacherId},
};

use crate::business_span;
use crate::utils::dates::{monday_of, parse_reference_date, schedule_window};
use crate::utils::tracing::record_success;

use super::empty_lessons::fill_schedule;
use super::grouping::{group_lessons, lessons_times};
use super::model::BatchGroupsRequest;
use super::store::{LessonStore, NearestLesson, bounded};
use super::week_type::{WeekAssignment, resolve};

/// Engine output for one entity, before it is shaped into a view.
#[derive(Debug, Clone)]
pub struct ResolvedSchedule {
    pub assignment: WeekAssignment,
    pub grid: ScheduleGrid,
    pub lessons_times: Vec<String>,
    pub profile: EntityProfile,
}

pub struct ScheduleService;

impl ScheduleService {
    /// Runs the engine for one entity around `reference_date`.
    ///
    /// Neighbouring lessons are only looked up when the window carries no
    /// known label, and the later neighbour only when there is no earlier one.
    pub async fn resolve_schedule(
        store: &dyn LessonStore,
        config: &ScheduleConfig,
        selector: &EntitySelector,
        reference_date: NaiveDate,
        add_empty_lessons: bool,
    ) -> Result<ResolvedSchedule, AppError> {
        let span = business_span!(
            "schedule.resolve",
            selector = %selector,
            reference_date = %reference_date,
            add_empty_lessons
        );
        Self::run_engine(store, config, selector, reference_date, add_empty_lessons)
            .instrument(span)
            .await
    }

    async fn run_engine(
        store: &dyn LessonStore,
        config: &ScheduleConfig,
        selector: &EntitySelector,
        reference_date: NaiveDate,
        add_empty_lessons: bool,
    ) -> Result<ResolvedSchedule, AppError> {
        let timeout = config.store_timeout;

        let profile = bounded(timeout, store.entity_profile(selector))
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("schedule for {} not found", selector)))?;

        let (start, end) = schedule_window(reference_date)?;
        let rows = bounded(timeout, store.fetch_lesson_window(selector, start, end)).await?;

        let mut before = None;
        let mut after = None;
        if !rows.iter().any(|row| row.week_type.known().is_some()) {
            before = bounded(
                timeout,
                store.fetch_nearest_labeled_lesson(selector, NearestLesson::Before(start)),
            )
            .await?;
            if before.is_none() {
                after = bounded(
                    timeout,
                    store.fetch_nearest_labeled_lesson(selector, NearestLesson::After(end)),
                )
                .await?;
            }
        }

        let assignment = resolve(reference_date, &rows, before.as_ref(), after.as_ref());
        let mut grid = group_lessons(&rows, &assignment);
        let lessons_times = lessons_times(&grid);
        if add_empty_lessons {
            fill_schedule(&mut grid, &lessons_times);
        }

        debug!(rows = rows.len(), slots = lessons_times.len(), "Schedule assembled");
        record_success();

        Ok(ResolvedSchedule {
            assignment,
            grid,
            lessons_times,
            profile,
        })
    }

    #[instrument(skip(store, cache, config))]
    pub async fn get_group_schedule(
        store: &dyn LessonStore,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        group: &str,
        date: Option<&str>,
        add_empty_lessons: bool,
    ) -> Result<StudentSchedule, AppError> {
        let number = parse_group_number(group)?;
        let reference_date = parse_reference_date(date, config.today())?;

        Self::student_schedule(store, cache, config, number, reference_date, add_empty_lessons)
            .await
    }

    /// Schedules of several groups for the same date. Duplicates collapse after
    /// normalisation, unknown groups are skipped, and the request order is kept.
    #[instrument(skip(store, cache, config))]
    pub async fn get_group_schedules(
        store: &dyn LessonStore,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        request: BatchGroupsRequest,
        date: Option<&str>,
        add_empty_lessons: bool,
    ) -> Result<Vec<StudentSchedule>, AppError> {
        let reference_date = parse_reference_date(date, config.today())?;

        let mut seen = HashSet::new();
        let mut numbers = Vec::with_capacity(request.groups.len());
        for raw in &request.groups {
            let number = parse_group_number(raw)?;
            if seen.insert(number.clone()) {
                numbers.push(number);
            }
        }

        let mut schedules = Vec::with_capacity(numbers.len());
        for number in numbers {
            match Self::student_schedule(store, cache, config, number, reference_date, add_empty_lessons)
                .await
            {
                Ok(schedule) => schedules.push(schedule),
                Err(e) if e.is_not_found() => debug!(error = %e.error, "Skipping unknown group"),
                Err(e) => return Err(e),
            }
        }

        if schedules.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "none of the requested groups have a schedule"
            )));
        }

        Ok(schedules)
    }

    #[instrument(skip(store, cache, config))]
    pub async fn get_teacher_schedule(
        store: &dyn LessonStore,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        teacher_id: TeacherId,
        date: Option<&str>,
        add_empty_lessons: bool,
    ) -> Result<TeacherSchedule, AppError> {
        let reference_date = parse_reference_date(date, config.today())?;
        let selector = EntitySelector::Teacher(teacher_id);
        let key = view_key(&selector, reference_date, add_empty_lessons);

        cached(cache, &key, || async move {
            let resolved = Self::resolve_schedule(
                store,
                config,
                &selector,
                reference_date,
                add_empty_lessons,
            )
            .await?;

            let EntityProfile::Teacher {
                teacher,
                departments,
            } = resolved.profile
            else {
                return Err(unexpected_profile(&selector));
            };

            Ok(TeacherSchedule {
                teacher,
                departments,
                numerator_period: resolved.assignment.numerator_period(),
                denominator_period: resolved.assignment.denominator_period(),
                input_week_type: resolved.assignment.input_week_type(),
                lessons_times: resolved.lessons_times,
                schedule: resolved.grid.map(TeacherLesson::from),
            })
        })
        .await
    }

    #[instrument(skip(store, cache, config))]
    pub async fn get_auditorium_schedule(
        store: &dyn LessonStore,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        auditorium_id: AuditoriumId,
        date: Option<&str>,
        add_empty_lessons: bool,
    ) -> Result<AuditoriumSchedule, AppError> {
        let reference_date = parse_reference_date(date, config.today())?;
        let selector = EntitySelector::Auditorium(auditorium_id);
        let key = view_key(&selector, reference_date, add_empty_lessons);

        cached(cache, &key, || async move {
            let resolved = Self::resolve_schedule(
                store,
                config,
                &selector,
                reference_date,
                add_empty_lessons,
            )
            .await?;

            let EntityProfile::Auditorium(auditorium) = resolved.profile else {
                return Err(unexpected_profile(&selector));
            };

            Ok(AuditoriumSchedule {
                auditorium,
                numerator_period: resolved.assignment.numerator_period(),
                denominator_period: resolved.assignment.denominator_period(),
                input_week_type: resolved.assignment.input_week_type(),
                lessons_times: resolved.lessons_times,
                schedule: resolved.grid.map(AuditoriumLesson::from),
            })
        })
        .await
    }

    async fn student_schedule(
        store: &dyn LessonStore,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        number: GroupNumber,
        reference_date: NaiveDate,
        add_empty_lessons: bool,
    ) -> Result<StudentSchedule, AppError> {
        let selector = EntitySelector::Group(number);
        let key = view_key(&selector, reference_date, add_empty_lessons);

        cached(cache, &key, || async move {
            let resolved = Self::resolve_schedule(
                store,
                config,
                &selector,
                reference_date,
                add_empty_lessons,
            )
            .await?;

            let EntityProfile::Group(info) = resolved.profile else {
                return Err(unexpected_profile(&selector));
            };

            Ok(StudentSchedule {
                group: info.number,
                faculty: info.faculty,
                course: info.course,
                numerator_period: resolved.assignment.numerator_period(),
                denominator_period: resolved.assignment.denominator_period(),
                input_week_type: resolved.assignment.input_week_type(),
                lessons_times: resolved.lessons_times,
                schedule: resolved.grid.map(StudentLesson::from),
            })
        })
        .await
    }
}

fn parse_group_number(raw: &str) -> Result<GroupNumber, AppError> {
    GroupNumber::new(raw).map_err(|e| AppError::bad_request(anyhow!(e)))
}

/// Every date of a week resolves to the same schedule, so the key uses its Monday.
fn view_key(selector: &EntitySelector, reference_date: NaiveDate, add_empty_lessons: bool) -> String {
    keys::schedules::view(
        selector.kind(),
        &selector.key(),
        monday_of(reference_date),
        add_empty_lessons,
    )
}

fn unexpected_profile(selector: &EntitySelector) -> AppError {
    AppError::internal(anyhow!("lesson store returned a mismatched profile for {}", selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::http::StatusCode;
    use timetable_models::{
        GroupInfo, LessonRecord, LessonType, TeacherAuditorium, TeacherInfo, WeekType,
        WeekTypeLabel, Weekday, ids::LessonId,
    };

    use crate::modules::schedule::store::MemoryLessonStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn group() -> GroupInfo {
        GroupInfo {
            number: GroupNumber::new("344").unwrap(),
            course: 3,
            faculty: "ФИТ".into(),
        }
    }

    fn lesson(id: i32, day: NaiveDate, time: &str, label: WeekTypeLabel) -> LessonRecord {
        LessonRecord {
            id: LessonId::new(id),
            date: day,
            time: time.into(),
            start_time: None,
            end_time: None,
            title: "Физика".into(),
            lesson_type: LessonType::Lecture,
            week_type: label,
            teacher_auditoriums: vec![TeacherAuditorium {
                teacher: Some(TeacherInfo {
                    id: TeacherId::new(1),
                    full_name: "Иванов Иван Иванович".into(),
                    short_name: "Иванов И.И.".into(),
                    link: None,
                }),
                auditorium: None,
            }],
            group: Some(group()),
        }
    }

    fn config() -> ScheduleConfig {
        ScheduleConfig {
            store_timeout: Duration::from_millis(200),
            ..ScheduleConfig::default()
        }
    }

    #[tokio::test]
    async fn test_labels_in_window_decide_weeks() {
        // 2025-03-10 is a Monday; the second week starts 2025-03-17.
        let store = MemoryLessonStore::new().with_lessons([
            lesson(1, date(2025, 3, 11), "08.10-09.45", WeekTypeLabel::Denominator),
            lesson(2, date(2025, 3, 18), "09.55-11.30", WeekTypeLabel::Unknown),
        ]);

        let schedule = ScheduleService::get_group_schedule(
            &store,
            None,
            &config(),
            "344",
            Some("2025-03-12"),
            false,
        )
        .await
        .unwrap();

        assert_eq!(schedule.input_week_type, WeekType::Denominator);
        assert_eq!(schedule.denominator_period, "10.03-16.03");
        assert_eq!(schedule.numerator_period, "17.03-23.03");
        assert_eq!(schedule.schedule.denominator.tuesday.len(), 1);
        assert_eq!(schedule.schedule.numerator.tuesday.len(), 1);
        assert_eq!(schedule.schedule.numerator.tuesday[0].time, "09.55-11.30");
    }

    #[tokio::test]
    async fn test_prediction_uses_earlier_neighbour() {
        // Numerator three weeks before the window: the first week is a denominator.
        let store = MemoryLessonStore::new().with_lessons([
            lesson(1, date(2025, 2, 17), "08.10-09.45", WeekTypeLabel::Numerator),
            lesson(2, date(2025, 3, 12), "08.10-09.45", WeekTypeLabel::Unknown),
            lesson(3, date(2025, 4, 2), "08.10-09.45", WeekTypeLabel::Numerator),
        ]);

        let resolved = ScheduleService::resolve_schedule(
            &store,
            &config(),
            &EntitySelector::Group(GroupNumber::new("344").unwrap()),
            date(2025, 3, 12),
            false,
        )
        .await
        .unwrap();

        assert_eq!(resolved.assignment.first_week, WeekType::Denominator);
        assert_eq!(
            resolved
                .grid
                .week(WeekType::Denominator)
                .day(Weekday::Wednesday)
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_known_entity_without_lessons_gets_empty_grid() {
        let store = MemoryLessonStore::new().with_group(group());

        let schedule = ScheduleService::get_group_schedule(
            &store,
            None,
            &config(),
            " 344 ",
            Some("2025-03-12"),
            true,
        )
        .await
        .unwrap();

        assert_eq!(schedule.input_week_type, WeekType::Numerator);
        assert!(schedule.lessons_times.is_empty());
        assert!(schedule.schedule.numerator.is_empty());
        assert!(schedule.schedule.denominator.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_entity_is_not_found() {
        let err = ScheduleService::get_teacher_schedule(
            &MemoryLessonStore::new(),
            None,
            &config(),
            TeacherId::new(99),
            None,
            false,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "schedule for teacher 99 not found");
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_bad_requests() {
        let store = MemoryLessonStore::new().with_group(group());

        let err = ScheduleService::get_group_schedule(&store, None, &config(), "344", Some("12.03.2025"), false)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = ScheduleService::get_group_schedule(&store, None, &config(), "   ", None, false)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_slow_store_is_unavailable() {
        let store = MemoryLessonStore::new()
            .with_group(group())
            .with_delay(Duration::from_secs(5));

        let err = ScheduleService::get_group_schedule(&store, None, &config(), "344", None, false)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_batch_skips_unknown_and_collapses_duplicates() {
        let store = MemoryLessonStore::new().with_group(group());
        let request = BatchGroupsRequest {
            groups: vec!["344".into(), "999".into(), " 344".into()],
        };

        let schedules = ScheduleService::get_group_schedules(
            &store,
            None,
            &config(),
            request,
            Some("2025-03-12"),
            false,
        )
        .await
        .unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].group.as_str(), "344");

        let err = ScheduleService::get_group_schedules(
            &store,
            None,
            &config(),
            BatchGroupsRequest {
                groups: vec!["999".into()],
            },
            None,
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_padding_trims_trailing_placeholders() {
        let store = MemoryLessonStore::new().with_lessons([
            lesson(1, date(2025, 3, 10), "08.10-09.45", WeekTypeLabel::Numerator),
            lesson(2, date(2025, 3, 10), "11.40-13.15", WeekTypeLabel::Numerator),
            lesson(3, date(2025, 3, 11), "09.55-11.30", WeekTypeLabel::Numerator),
        ]);

        let schedule = ScheduleService::get_group_schedule(
            &store,
            None,
            &config(),
            "344",
            Some("2025-03-10"),
            true,
        )
        .await
        .unwrap();

        let monday: Vec<&str> = schedule
            .schedule
            .numerator
            .monday
            .iter()
            .map(|l| l.time.as_str())
            .collect();
        assert_eq!(monday, vec!["08.10-09.45", "09.55-11.30", "11.40-13.15"]);

        let tuesday = &schedule.schedule.numerator.tuesday;
        assert_eq!(tuesday.len(), 2);
        assert_eq!(tuesday[0].lesson, timetable_models::EMPTY_LESSON_TEXT);
        assert_eq!(tuesday[1].time, "09.55-11.30");
    }
}
