use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use timetable_cache::{RedisCache, cached, hash_filters, keys};
use timetable_core::AppError;
use timetable_models::ids::{AuditoriumId, BuildingId};

use super::model::{Auditorium, AuditoriumFilterParams, AuditoriumRow, Building};

const AUDITORIUM_SELECT: &str = r#"
    SELECT a.id, a.number, b.id AS building_id,
           b.title AS building_title, b.letter AS building_letter
    FROM auditorium a
    LEFT JOIN building b ON b.id = a.building_id"#;

pub struct AuditoriumService;

impl AuditoriumService {
    #[instrument(skip(db, cache))]
    pub async fn get_buildings(
        db: &PgPool,
        cache: Option<&RedisCache>,
    ) -> Result<Vec<Building>, AppError> {
        let key = keys::directory::listing("buildings", "all");

        cached(cache, &key, || async move {
            let buildings = sqlx::query_as::<_, Building>(
                "SELECT id, title, letter FROM building ORDER BY title, id",
            )
            .fetch_all(db)
            .await?;

            if buildings.is_empty() {
                return Err(AppError::not_found(anyhow!("no buildings found")));
            }
            Ok(buildings)
        })
        .await
    }

    #[instrument(skip(db))]
    pub async fn get_building(db: &PgPool, id: BuildingId) -> Result<Building, AppError> {
        sqlx::query_as::<_, Building>("SELECT id, title, letter FROM building WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("building {} not found", id)))
    }

    /// Auditoriums sorted by building, then by room number.
    #[instrument(skip(db, cache))]
    pub async fn get_auditoriums(
        db: &PgPool,
        cache: Option<&RedisCache>,
        filters: AuditoriumFilterParams,
    ) -> Result<Vec<Auditorium>, AppError> {
        let key = keys::directory::listing("auditoriums", &hash_filters(&filters.building_id));

        cached(cache, &key, || async move {
            let rows = sqlx::query_as::<_, AuditoriumRow>(&format!(
                r#"{AUDITORIUM_SELECT}
                   WHERE ($1::integer IS NULL OR a.building_id = $1)
                   ORDER BY b.title NULLS LAST, a.number, a.id"#
            ))
            .bind(filters.building_id)
            .fetch_all(db)
            .await?;

            if rows.is_empty() {
                return Err(match filters.building_id {
                    Some(id) => {
                        AppError::not_found(anyhow!("no auditoriums found in building {}", id))
                    }
                    None => AppError::not_found(anyhow!("no auditoriums found")),
                });
            }
            Ok(rows.into_iter().map(Auditorium::from).collect())
        })
        .await
    }

    #[instrument(skip(db))]
    pub async fn get_auditorium(db: &PgPool, id: AuditoriumId) -> Result<Auditorium, AppError> {
        sqlx::query_as::<_, AuditoriumRow>(&format!("{AUDITORIUM_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(Auditorium::from)
            .ok_or_else(|| AppError::not_found(anyhow!("auditorium {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires Postgres"]
    async fn test_auditoriums_by_building(pool: PgPool) {
        sqlx::raw_sql(
            r#"INSERT INTO building (id, title, letter) VALUES (1, 'Главный корпус', 'Г'), (2, 'Лабораторный', '');
               INSERT INTO auditorium (id, number, building_id) VALUES (1, '305', 1), (2, '101', 1), (3, '7', 2);"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let main = AuditoriumService::get_auditoriums(
            &pool,
            None,
            AuditoriumFilterParams {
                building_id: Some(1),
            },
        )
        .await
        .unwrap();
        let names: Vec<&str> = main.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, vec!["101 Г", "305 Г"]);

        let lab = AuditoriumService::get_auditorium(&pool, AuditoriumId::new(3))
            .await
            .unwrap();
        assert_eq!(lab.display_name, "7");

        let err = AuditoriumService::get_building(&pool, BuildingId::new(9))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
