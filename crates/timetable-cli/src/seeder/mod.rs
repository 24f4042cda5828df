//! Database seeding for the timetable tables.
//!
//! # Module Structure
//!
//! - [`directory`] - faculties, departments, teachers, buildings, auditoriums and groups
//! - [`lessons`] - dated lessons with teacher and auditorium links
//! - [`models`] - seeding configuration and generated rows
//!
//! # Performance
//!
//! - Parallel data generation using Rayon
//! - Batch inserts with multi-value INSERT statements
//! - One transaction for the whole run, so a failed seed leaves nothing behind

pub mod directory;
pub mod lessons;
pub mod models;

pub use models::{SeedConfig, monday_of};

use sqlx::PgPool;
use std::time::Instant;

/// Counts reported after a seeding run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub faculties: usize,
    pub teachers: usize,
    pub auditoriums: usize,
    pub groups: usize,
    pub lessons: usize,
}

/// Seeds the directory tables and lessons in a single transaction.
pub async fn seed_all(
    db: &PgPool,
    config: &SeedConfig,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   - {} faculties, {} courses x {} groups each",
        config.faculties, config.courses, config.groups_per_course
    );
    println!(
        "   - {} weeks from {}, {:.0}% of lessons unlabelled",
        config.weeks,
        config.start_monday,
        config.unknown_ratio * 100.0
    );

    let mut tx = db.begin().await?;

    println!("\n📚 Seeding directory...");
    let dir_start = Instant::now();
    let ids = directory::seed_directory(&mut tx, config).await?;
    println!("   ✓ Directory seeded in {:?}", dir_start.elapsed());

    println!("\n🗓️  Seeding lessons...");
    let lesson_start = Instant::now();
    let lessons = lessons::seed_lessons(&mut tx, config, &ids).await?;
    println!(
        "   ✓ Inserted {} lessons in {:?}",
        lessons,
        lesson_start.elapsed()
    );

    tx.commit().await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());

    Ok(SeedSummary {
        faculties: ids.faculties.len(),
        teachers: ids.teachers.len(),
        auditoriums: ids.auditoriums.len(),
        groups: ids.groups.len(),
        lessons,
    })
}

/// Deletes all schedule data. Returns the number of deleted lessons.
pub async fn clear_all(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing schedule data...");

    let mut tx = db.begin().await?;

    // Links cascade from lessons, memberships from teachers.
    let lessons_deleted = sqlx::query("DELETE FROM lesson")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for table in [
        r#""group""#,
        "teacher",
        "department",
        "faculty",
        "auditorium",
        "building",
    ] {
        let deleted = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ {}: {} rows", table.trim_matches('"'), deleted);
    }

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} lessons in {:?}",
        lessons_deleted,
        start_time.elapsed()
    );

    Ok(lessons_deleted)
}
