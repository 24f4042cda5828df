use std::collections::BTreeMap;

use anyhow::anyhow;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use timetable_cache::{RedisCache, cached, hash_filters, keys};
use timetable_config::ScheduleConfig;
use timetable_core::AppError;
use timetable_models::{
    GroupNumber,
    ids::FacultyId,
    value_types::compare_group_numbers,
};

use crate::utils::dates::{listing_window, parse_reference_date};

use super::model::{CourseFaculties, Faculty, FacultyCourseGroups, FacultyCourses};

/// Lessons of the group dated inside `[$1, $2]`.
const HAS_LESSONS_IN_WINDOW: &str =
    "EXISTS (SELECT 1 FROM lesson l WHERE l.group_id = g.id AND l.date BETWEEN $1 AND $2)";

#[derive(Debug, FromRow)]
struct FacultyCourseRow {
    id: FacultyId,
    title: String,
    title_short: String,
    course: i32,
}

pub struct FacultyService;

impl FacultyService {
    /// Faculties that have at least one group.
    #[instrument(skip(db, cache))]
    pub async fn get_faculties(
        db: &PgPool,
        cache: Option<&RedisCache>,
    ) -> Result<Vec<Faculty>, AppError> {
        let key = keys::directory::listing("faculties", "all");

        cached(cache, &key, || async move {
            let faculties = sqlx::query_as::<_, Faculty>(
                r#"SELECT f.id, f.title, f.title_short
                   FROM faculty f
                   WHERE EXISTS (SELECT 1 FROM "group" g WHERE g.faculty_id = f.id)
                   ORDER BY f.title"#,
            )
            .fetch_all(db)
            .await?;

            if faculties.is_empty() {
                return Err(AppError::not_found(anyhow!("no faculties found")));
            }
            Ok(faculties)
        })
        .await
    }

    #[instrument(skip(db, cache, config))]
    pub async fn get_faculties_with_courses(
        db: &PgPool,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        date: Option<&str>,
    ) -> Result<Vec<FacultyCourses>, AppError> {
        let (start, end) = window(config, date)?;
        let key = keys::directory::listing("faculty-courses", &hash_filters(&(start, end)));

        cached(cache, &key, || async move {
            let rows = sqlx::query_as::<_, FacultyCourseRow>(&format!(
                r#"SELECT f.id, f.title, f.title_short, g.course
                   FROM faculty f
                   JOIN "group" g ON g.faculty_id = f.id
                   WHERE {HAS_LESSONS_IN_WINDOW}
                   GROUP BY f.id, f.title, f.title_short, g.course
                   ORDER BY f.title, g.course"#
            ))
            .bind(start)
            .bind(end)
            .fetch_all(db)
            .await?;

            let faculties = collect_faculty_courses(rows);
            if faculties.is_empty() {
                return Err(AppError::not_found(anyhow!(
                    "no faculties with lessons between {} and {}",
                    start,
                    end
                )));
            }
            Ok(faculties)
        })
        .await
    }

    #[instrument(skip(db, cache, config))]
    pub async fn get_courses(
        db: &PgPool,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        faculty: &str,
        date: Option<&str>,
    ) -> Result<Vec<i32>, AppError> {
        let faculty = faculty.trim();
        let (start, end) = window(config, date)?;
        let key = keys::directory::listing("courses", &hash_filters(&(faculty, start, end)));

        cached(cache, &key, || async move {
            let courses = sqlx::query_scalar::<_, i32>(&format!(
                r#"SELECT DISTINCT g.course
                   FROM "group" g
                   JOIN faculty f ON f.id = g.faculty_id
                   WHERE f.title_short = $3 AND {HAS_LESSONS_IN_WINDOW}
                   ORDER BY g.course"#
            ))
            .bind(start)
            .bind(end)
            .bind(faculty)
            .fetch_all(db)
            .await?;

            if courses.is_empty() {
                return Err(AppError::not_found(anyhow!(
                    "no courses found for faculty {}",
                    faculty
                )));
            }
            Ok(courses)
        })
        .await
    }

    #[instrument(skip(db, cache, config))]
    pub async fn get_faculties_by_course(
        db: &PgPool,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        course: i32,
        date: Option<&str>,
    ) -> Result<CourseFaculties, AppError> {
        let (start, end) = window(config, date)?;
        let key = keys::directory::listing("course-faculties", &hash_filters(&(course, start, end)));

        cached(cache, &key, || async move {
            let faculties = sqlx::query_as::<_, Faculty>(&format!(
                r#"SELECT DISTINCT f.id, f.title, f.title_short
                   FROM faculty f
                   JOIN "group" g ON g.faculty_id = f.id
                   WHERE g.course = $3 AND {HAS_LESSONS_IN_WINDOW}
                   ORDER BY f.title"#
            ))
            .bind(start)
            .bind(end)
            .bind(course)
            .fetch_all(db)
            .await?;

            if faculties.is_empty() {
                return Err(AppError::not_found(anyhow!(
                    "no faculties found for course {}",
                    course
                )));
            }
            Ok(CourseFaculties { course, faculties })
        })
        .await
    }

    /// Group numbers of a faculty and course, ordinary groups before master's ones.
    #[instrument(skip(db, cache, config))]
    pub async fn get_groups(
        db: &PgPool,
        cache: Option<&RedisCache>,
        config: &ScheduleConfig,
        faculty: &str,
        course: i32,
        date: Option<&str>,
    ) -> Result<FacultyCourseGroups, AppError> {
        let faculty = faculty.trim();
        let (start, end) = window(config, date)?;
        let key =
            keys::directory::listing("groups", &hash_filters(&(faculty, course, start, end)));

        cached(cache, &key, || async move {
            let mut groups = sqlx::query_scalar::<_, GroupNumber>(&format!(
                r#"SELECT g.number
                   FROM "group" g
                   JOIN faculty f ON f.id = g.faculty_id
                   WHERE f.title_short = $3 AND g.course = $4 AND {HAS_LESSONS_IN_WINDOW}"#
            ))
            .bind(start)
            .bind(end)
            .bind(faculty)
            .bind(course)
            .fetch_all(db)
            .await?;

            if groups.is_empty() {
                return Err(AppError::not_found(anyhow!(
                    "no groups found for faculty {} and course {}",
                    faculty,
                    course
                )));
            }
            groups.sort_by(compare_group_numbers);

            Ok(FacultyCourseGroups {
                faculty: faculty.to_string(),
                course,
                groups,
            })
        })
        .await
    }
}

fn window(config: &ScheduleConfig, date: Option<&str>) -> Result<(NaiveDate, NaiveDate), AppError> {
    let reference = parse_reference_date(date, config.today())?;
    Ok(listing_window(reference, config.listing_months))
}

/// Folds `(faculty, course)` rows, already ordered by faculty, into one entry per faculty.
fn collect_faculty_courses(rows: Vec<FacultyCourseRow>) -> Vec<FacultyCourses> {
    let mut order = Vec::new();
    let mut by_faculty: BTreeMap<FacultyId, FacultyCourses> = BTreeMap::new();

    for row in rows {
        by_faculty
            .entry(row.id)
            .or_insert_with(|| {
                order.push(row.id);
                FacultyCourses {
                    faculty: Faculty {
                        id: row.id,
                        title: row.title.clone(),
                        title_short: row.title_short.clone(),
                    },
                    courses: Vec::new(),
                }
            })
            .courses
            .push(row.course);
    }

    order
        .into_iter()
        .filter_map(|id| by_faculty.remove(&id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, title: &str, course: i32) -> FacultyCourseRow {
        FacultyCourseRow {
            id: FacultyId::new(id),
            title: title.to_string(),
            title_short: title.to_string(),
            course,
        }
    }

    #[test]
    fn test_collect_faculty_courses_keeps_order() {
        let faculties = collect_faculty_courses(vec![
            row(2, "Биология", 1),
            row(2, "Биология", 3),
            row(1, "Физика", 2),
        ]);

        assert_eq!(faculties.len(), 2);
        assert_eq!(faculties[0].faculty.id, FacultyId::new(2));
        assert_eq!(faculties[0].courses, vec![1, 3]);
        assert_eq!(faculties[1].courses, vec![2]);
    }

    #[test]
    fn test_window_rejects_bad_date() {
        let config = ScheduleConfig::default();
        assert!(window(&config, Some("2025/03/12")).is_err());

        let (start, end) = window(&config, Some("2025-03-12")).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 9, 12).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires Postgres"]
    async fn test_groups_sorted_with_masters_last(pool: PgPool) {
        sqlx::raw_sql(
            r#"INSERT INTO faculty (id, title, title_short) VALUES (1, 'Информационные технологии', 'ФИТ');
               INSERT INTO "group" (id, number, course, faculty_id) VALUES
                   (1, '232М', 1, 1), (2, '1011', 1, 1), (3, '131', 1, 1);
               INSERT INTO lesson (group_id, date, time, title, type, week_type) VALUES
                   (1, '2025-03-11', '08.10-09.45', 'Физика', 'lecture', 'unknown'),
                   (2, '2025-03-11', '08.10-09.45', 'Физика', 'lecture', 'unknown'),
                   (3, '2025-03-11', '08.10-09.45', 'Физика', 'lecture', 'unknown');"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let groups = FacultyService::get_groups(
            &pool,
            None,
            &ScheduleConfig::default(),
            "ФИТ",
            1,
            Some("2025-03-12"),
        )
        .await
        .unwrap();

        let numbers: Vec<&str> = groups.groups.iter().map(GroupNumber::as_str).collect();
        assert_eq!(numbers, vec!["131", "1011", "232М"]);
    }
}
