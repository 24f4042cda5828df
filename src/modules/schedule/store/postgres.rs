use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, PgPool, Postgres, postgres::PgArguments, query::QueryAs};
use timetable_models::{
    EntityProfile, EntitySelector, GroupInfo, GroupNumber, LessonRecord, LessonType,
    TeacherAuditorium, TeacherInfo, WeekTypeLabel,
    auditoriums::{Auditorium, AuditoriumRow, Building},
    ids::{AuditoriumId, BuildingId, LessonId, TeacherId},
};
use tracing::Instrument;

use super::{LessonStore, NearestLesson, StoreError};
use crate::db_operation_span;
use crate::utils::tracing::record_rows;

const LESSON_COLUMNS: &str = r#"
    l.id, l.date, l.time, l.start_time, l.end_time, l.title,
    l.type AS lesson_type, l.week_type,
    g.number AS group_number, g.course AS group_course, f.title_short AS faculty"#;

const PARTICIPANT_COLUMNS: &str = r#"
    t.id AS teacher_id, t.full_name AS teacher_full_name,
    t.short_name AS teacher_short_name, t.link AS teacher_link,
    a.id AS auditorium_id, a.number AS auditorium_number,
    b.id AS building_id, b.title AS building_title, b.letter AS building_letter"#;

const NO_PARTICIPANT_COLUMNS: &str = r#"
    NULL::integer AS teacher_id, NULL::text AS teacher_full_name,
    NULL::text AS teacher_short_name, NULL::text AS teacher_link,
    NULL::integer AS auditorium_id, NULL::text AS auditorium_number,
    NULL::integer AS building_id, NULL::text AS building_title, NULL::text AS building_letter"#;

/// Lesson store backed by the Postgres timetable schema.
#[derive(Debug, Clone)]
pub struct PgLessonStore {
    pool: PgPool,
}

impl PgLessonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One lesson joined with at most one teacher/auditorium link.
#[derive(Debug, FromRow)]
struct LessonRow {
    id: LessonId,
    date: NaiveDate,
    time: String,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    title: String,
    lesson_type: String,
    week_type: String,
    group_number: String,
    group_course: i32,
    faculty: String,
    teacher_id: Option<TeacherId>,
    teacher_full_name: Option<String>,
    teacher_short_name: Option<String>,
    teacher_link: Option<String>,
    auditorium_id: Option<AuditoriumId>,
    auditorium_number: Option<String>,
    building_id: Option<BuildingId>,
    building_title: Option<String>,
    building_letter: Option<String>,
}

impl LessonRow {
    fn take_participant(&mut self) -> Option<TeacherAuditorium> {
        let teacher = self.teacher_id.map(|id| TeacherInfo {
            id,
            full_name: self.teacher_full_name.take().unwrap_or_default(),
            short_name: self.teacher_short_name.take().unwrap_or_default(),
            link: self.teacher_link.take(),
        });
        let auditorium = self.auditorium_id.map(|id| {
            let building = self.building_id.map(|building_id| Building {
                id: building_id,
                title: self.building_title.take().unwrap_or_default(),
                letter: self.building_letter.take().unwrap_or_default(),
            });
            Auditorium::new(id, self.auditorium_number.take().unwrap_or_default(), building)
        });

        let pair = TeacherAuditorium {
            teacher,
            auditorium,
        };
        (!pair.is_empty()).then_some(pair)
    }

    fn into_record(mut self) -> LessonRecord {
        let teacher_auditoriums = self.take_participant().into_iter().collect();
        LessonRecord {
            id: self.id,
            date: self.date,
            time: self.time,
            start_time: self.start_time,
            end_time: self.end_time,
            title: self.title,
            lesson_type: LessonType::from_db(&self.lesson_type),
            week_type: WeekTypeLabel::from_db(&self.week_type),
            teacher_auditoriums,
            group: Some(GroupInfo {
                number: GroupNumber::new_unchecked(self.group_number),
                course: self.group_course,
                faculty: self.faculty,
            }),
        }
    }
}

/// Collapses the lesson x link join back into one record per lesson, keeping row order.
fn fold_rows(rows: Vec<LessonRow>) -> Vec<LessonRecord> {
    let mut records: Vec<LessonRecord> = Vec::with_capacity(rows.len());
    let mut positions: HashMap<LessonId, usize> = HashMap::new();

    for mut row in rows {
        match positions.get(&row.id) {
            Some(&position) => {
                if let Some(pair) = row.take_participant() {
                    records[position].teacher_auditoriums.push(pair);
                }
            }
            None => {
                positions.insert(row.id, records.len());
                records.push(row.into_record());
            }
        }
    }

    records
}

/// Filter on the joined link row; restricts participants to the selected entity.
fn window_filter(selector: &EntitySelector) -> &'static str {
    match selector {
        EntitySelector::Group(_) => "g.number = $1",
        EntitySelector::Teacher(_) => "lat.teacher_id = $1",
        EntitySelector::Auditorium(_) => "lat.auditorium_id = $1",
    }
}

/// Filter that does not multiply lesson rows.
fn existence_filter(selector: &EntitySelector) -> &'static str {
    match selector {
        EntitySelector::Group(_) => "g.number = $1",
        EntitySelector::Teacher(_) => {
            "EXISTS (SELECT 1 FROM lesson_auditorium_teacher lat \
             WHERE lat.lesson_id = l.id AND lat.teacher_id = $1)"
        }
        EntitySelector::Auditorium(_) => {
            "EXISTS (SELECT 1 FROM lesson_auditorium_teacher lat \
             WHERE lat.lesson_id = l.id AND lat.auditorium_id = $1)"
        }
    }
}

fn bind_selector<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    selector: &EntitySelector,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match selector {
        EntitySelector::Group(number) => query.bind(number.as_str().to_owned()),
        EntitySelector::Teacher(id) => query.bind(*id),
        EntitySelector::Auditorium(id) => query.bind(*id),
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    number: String,
    course: i32,
    faculty: String,
}

#[async_trait]
impl LessonStore for PgLessonStore {
    async fn fetch_lesson_window(
        &self,
        selector: &EntitySelector,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LessonRecord>, StoreError> {
        let sql = format!(
            r#"SELECT {LESSON_COLUMNS}, {PARTICIPANT_COLUMNS}
               FROM lesson l
               JOIN "group" g ON g.id = l.group_id
               JOIN faculty f ON f.id = g.faculty_id
               LEFT JOIN lesson_auditorium_teacher lat ON lat.lesson_id = l.id
               LEFT JOIN teacher t ON t.id = lat.teacher_id
               LEFT JOIN auditorium a ON a.id = lat.auditorium_id
               LEFT JOIN building b ON b.id = a.building_id
               WHERE {filter} AND l.date BETWEEN $2 AND $3
               ORDER BY l.date, l.time, l.id, lat.id"#,
            filter = window_filter(selector),
        );

        let span = db_operation_span!("SELECT", "lesson", selector = %selector, window.start = %start, window.end = %end);
        let rows = bind_selector(sqlx::query_as::<_, LessonRow>(&sql), selector)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .instrument(span.clone())
            .await?;
        record_rows(&span, rows.len());

        Ok(fold_rows(rows))
    }

    async fn fetch_nearest_labeled_lesson(
        &self,
        selector: &EntitySelector,
        direction: NearestLesson,
    ) -> Result<Option<LessonRecord>, StoreError> {
        let (date, comparison, order) = match direction {
            NearestLesson::Before(date) => (date, "<", "DESC"),
            NearestLesson::After(date) => (date, ">", "ASC"),
        };
        let sql = format!(
            r#"SELECT {LESSON_COLUMNS}, {NO_PARTICIPANT_COLUMNS}
               FROM lesson l
               JOIN "group" g ON g.id = l.group_id
               JOIN faculty f ON f.id = g.faculty_id
               WHERE {filter}
                 AND l.week_type IN ('numerator', 'denominator')
                 AND l.date {comparison} $2
               ORDER BY l.date {order}, l.id {order}
               LIMIT 1"#,
            filter = existence_filter(selector),
        );

        let span = db_operation_span!("SELECT", "lesson", selector = %selector, direction = ?direction);
        let row = bind_selector(sqlx::query_as::<_, LessonRow>(&sql), selector)
            .bind(date)
            .fetch_optional(&self.pool)
            .instrument(span.clone())
            .await?;
        record_rows(&span, usize::from(row.is_some()));

        Ok(row.map(LessonRow::into_record))
    }

    async fn entity_profile(
        &self,
        selector: &EntitySelector,
    ) -> Result<Option<EntityProfile>, StoreError> {
        let span = db_operation_span!("SELECT", selector.kind(), selector = %selector);
        let profile = self.load_profile(selector).instrument(span.clone()).await?;
        record_rows(&span, usize::from(profile.is_some()));

        Ok(profile)
    }
}

impl PgLessonStore {
    async fn load_profile(
        &self,
        selector: &EntitySelector,
    ) -> Result<Option<EntityProfile>, StoreError> {
        let profile = match selector {
            EntitySelector::Group(number) => sqlx::query_as::<_, GroupRow>(
                r#"SELECT g.number, g.course, f.title_short AS faculty
                   FROM "group" g
                   JOIN faculty f ON f.id = g.faculty_id
                   WHERE g.number = $1"#,
            )
            .bind(number.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(|row| {
                EntityProfile::Group(GroupInfo {
                    number: GroupNumber::new_unchecked(row.number),
                    course: row.course,
                    faculty: row.faculty,
                })
            }),
            EntitySelector::Teacher(id) => {
                let Some(teacher) = sqlx::query_as::<_, TeacherInfo>(
                    "SELECT id, full_name, short_name, link FROM teacher WHERE id = $1",
                )
                .bind(*id)
                .fetch_optional(&self.pool)
                .await?
                else {
                    return Ok(None);
                };

                let departments = sqlx::query_scalar::<_, String>(
                    r#"SELECT d.title
                       FROM department d
                       JOIN teacher_department td ON td.department_id = d.id
                       WHERE td.teacher_id = $1
                       ORDER BY d.title"#,
                )
                .bind(*id)
                .fetch_all(&self.pool)
                .await?;

                Some(EntityProfile::Teacher {
                    teacher,
                    departments,
                })
            }
            EntitySelector::Auditorium(id) => sqlx::query_as::<_, AuditoriumRow>(
                r#"SELECT a.id, a.number, b.id AS building_id,
                          b.title AS building_title, b.letter AS building_letter
                   FROM auditorium a
                   LEFT JOIN building b ON b.id = a.building_id
                   WHERE a.id = $1"#,
            )
            .bind(*id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| EntityProfile::Auditorium(row.into())),
        };

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, teacher: Option<(i32, &str)>, auditorium: Option<(i32, &str)>) -> LessonRow {
        LessonRow {
            id: LessonId::new(id),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: "08.10-09.45".into(),
            start_time: None,
            end_time: None,
            title: "Физика".into(),
            lesson_type: "lab".into(),
            week_type: "".into(),
            group_number: "344".into(),
            group_course: 3,
            faculty: "ФИТ".into(),
            teacher_id: teacher.map(|(id, _)| TeacherId::new(id)),
            teacher_full_name: teacher.map(|(_, name)| format!("{} full", name)),
            teacher_short_name: teacher.map(|(_, name)| name.to_string()),
            teacher_link: None,
            auditorium_id: auditorium.map(|(id, _)| AuditoriumId::new(id)),
            auditorium_number: auditorium.map(|(_, number)| number.to_string()),
            building_id: auditorium.map(|_| BuildingId::new(1)),
            building_title: auditorium.map(|_| "Главный".to_string()),
            building_letter: auditorium.map(|_| "Б".to_string()),
        }
    }

    #[test]
    fn test_fold_rows_merges_links_of_one_lesson() {
        let records = fold_rows(vec![
            row(1, Some((7, "Иванов И.И.")), Some((3, "101"))),
            row(1, Some((8, "Петров П.П.")), None),
            row(2, None, None),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].teacher_auditoriums.len(), 2);
        assert_eq!(
            records[0].teacher_auditoriums[0].label(),
            "Иванов И.И. 101 Б"
        );
        assert!(records[1].teacher_auditoriums.is_empty());
        assert_eq!(records[0].lesson_type, LessonType::Lab);
        assert_eq!(records[0].week_type, WeekTypeLabel::Unknown);
    }

    #[test]
    fn test_filters_match_selector_kind() {
        let group = EntitySelector::Group(GroupNumber::new("344").unwrap());
        let teacher = EntitySelector::Teacher(TeacherId::new(1));
        assert_eq!(window_filter(&group), "g.number = $1");
        assert!(existence_filter(&teacher).contains("lat.teacher_id = $1"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires Postgres"]
    async fn test_window_and_neighbours_from_database(pool: PgPool) {
        sqlx::raw_sql(
            r#"INSERT INTO faculty (id, title, title_short) VALUES (1, 'Информационные технологии', 'ФИТ');
               INSERT INTO "group" (id, number, course, faculty_id) VALUES (1, '344', 3, 1);
               INSERT INTO teacher (id, full_name, short_name) VALUES (1, 'Иванов Иван Иванович', 'Иванов И.И.');
               INSERT INTO lesson (id, group_id, date, time, title, type, week_type) VALUES
                   (1, 1, '2025-02-24', '08.10-09.45', 'Физика', 'lecture', 'numerator'),
                   (2, 1, '2025-03-11', '08.10-09.45', 'Физика', 'lecture', 'unknown');
               INSERT INTO lesson_auditorium_teacher (lesson_id, teacher_id) VALUES (2, 1);"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let store = PgLessonStore::new(pool);
        let group = EntitySelector::Group(GroupNumber::new("344").unwrap());
        let from = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 23).unwrap();

        let window = store.fetch_lesson_window(&group, from, to).await.unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].teacher_auditoriums.len(), 1);

        let before = store
            .fetch_nearest_labeled_lesson(&group, NearestLesson::Before(from))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.id, LessonId::new(1));

        let teacher = EntitySelector::Teacher(TeacherId::new(1));
        assert!(store.entity_exists(&teacher).await.unwrap());
        let missing = EntitySelector::Group(GroupNumber::new("999").unwrap());
        assert!(!store.entity_exists(&missing).await.unwrap());
    }
}
