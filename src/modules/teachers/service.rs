use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use timetable_cache::{RedisCache, cached, hash_filters, keys};
use timetable_core::AppError;

use super::model::{Department, DepartmentFilterParams, TeacherFilterParams, TeacherInfo};

pub struct TeacherService;

impl TeacherService {
    /// Teachers sorted by full name. A faculty or department filter goes
    /// through the teacher's department memberships.
    #[instrument(skip(db, cache))]
    pub async fn get_teachers(
        db: &PgPool,
        cache: Option<&RedisCache>,
        filters: TeacherFilterParams,
    ) -> Result<Vec<TeacherInfo>, AppError> {
        let key = keys::directory::listing(
            "teachers",
            &hash_filters(&(filters.faculty_id, filters.department_id)),
        );

        cached(cache, &key, || async move {
            let teachers = sqlx::query_as::<_, TeacherInfo>(
                r#"SELECT DISTINCT t.id, t.full_name, t.short_name, t.link
                   FROM teacher t
                   LEFT JOIN teacher_department td ON td.teacher_id = t.id
                   LEFT JOIN department d ON d.id = td.department_id
                   WHERE ($1::integer IS NULL OR d.faculty_id = $1)
                     AND ($2::integer IS NULL OR d.id = $2)
                   ORDER BY t.full_name, t.id"#,
            )
            .bind(filters.faculty_id)
            .bind(filters.department_id)
            .fetch_all(db)
            .await?;

            if teachers.is_empty() {
                return Err(AppError::not_found(anyhow!(
                    "no teachers found for {}",
                    describe_filters(&filters)
                )));
            }
            Ok(teachers)
        })
        .await
    }

    #[instrument(skip(db, cache))]
    pub async fn get_departments(
        db: &PgPool,
        cache: Option<&RedisCache>,
        filters: DepartmentFilterParams,
    ) -> Result<Vec<Department>, AppError> {
        let key = keys::directory::listing("departments", &hash_filters(&filters.faculty_id));

        cached(cache, &key, || async move {
            let departments = sqlx::query_as::<_, Department>(
                r#"SELECT id, title, title_short, faculty_id
                   FROM department
                   WHERE ($1::integer IS NULL OR faculty_id = $1)
                   ORDER BY title"#,
            )
            .bind(filters.faculty_id)
            .fetch_all(db)
            .await?;

            if departments.is_empty() {
                return Err(match filters.faculty_id {
                    Some(id) => AppError::not_found(anyhow!("no departments found for faculty {}", id)),
                    None => AppError::not_found(anyhow!("no departments found")),
                });
            }
            Ok(departments)
        })
        .await
    }
}

fn describe_filters(filters: &TeacherFilterParams) -> String {
    match (filters.faculty_id, filters.department_id) {
        (None, None) => "any faculty".to_string(),
        (Some(faculty), None) => format!("faculty {}", faculty),
        (None, Some(department)) => format!("department {}", department),
        (Some(faculty), Some(department)) => {
            format!("faculty {} and department {}", faculty, department)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_filters() {
        let filters = TeacherFilterParams {
            faculty_id: Some(2),
            department_id: None,
        };
        assert_eq!(describe_filters(&filters), "faculty 2");
        assert_eq!(
            describe_filters(&TeacherFilterParams::default()),
            "any faculty"
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires Postgres"]
    async fn test_department_filter(pool: PgPool) {
        sqlx::raw_sql(
            r#"INSERT INTO faculty (id, title, title_short) VALUES (1, 'Физический', 'ФФ');
               INSERT INTO department (id, title, title_short, faculty_id) VALUES
                   (1, 'Кафедра оптики', 'КО', 1), (2, 'Кафедра механики', 'КМ', 1);
               INSERT INTO teacher (id, full_name, short_name) VALUES
                   (1, 'Петров Петр Петрович', 'Петров П.П.'),
                   (2, 'Андреев Андрей Андреевич', 'Андреев А.А.');
               INSERT INTO teacher_department (teacher_id, department_id) VALUES (1, 1), (2, 1), (2, 2);"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let all = TeacherService::get_teachers(&pool, None, TeacherFilterParams::default())
            .await
            .unwrap();
        assert_eq!(all[0].short_name, "Андреев А.А.");
        assert_eq!(all.len(), 2);

        let mechanics = TeacherService::get_teachers(
            &pool,
            None,
            TeacherFilterParams {
                faculty_id: None,
                department_id: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(mechanics.len(), 1);

        let err = TeacherService::get_departments(
            &pool,
            None,
            DepartmentFilterParams {
                faculty_id: Some(9),
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
