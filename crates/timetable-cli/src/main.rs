use chrono::{Datelike, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use timetable_cache::{CacheConfig, RedisCache, invalidate};
use timetable_cli::seeder::{self, SeedConfig};

#[derive(Parser)]
#[command(name = "timetable-cli")]
#[command(about = "Timetable CLI - Database seeding tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database with fake faculties, groups, teachers and lessons
    Seed {
        /// Number of faculties to create
        #[arg(short = 'f', long, default_value = "4")]
        faculties: usize,

        /// Number of departments per faculty
        #[arg(long, default_value = "3")]
        departments: usize,

        /// Number of teachers
        #[arg(short = 't', long, default_value = "60")]
        teachers: usize,

        /// Number of buildings
        #[arg(long, default_value = "3")]
        buildings: usize,

        /// Number of auditoriums per building
        #[arg(long, default_value = "20")]
        auditoriums: usize,

        /// Number of courses per faculty
        #[arg(short = 'c', long, default_value = "4", value_parser = clap::value_parser!(u8).range(1..=6))]
        courses: u8,

        /// Number of groups per course
        #[arg(short = 'g', long, default_value = "3", value_parser = clap::value_parser!(u8).range(1..=9))]
        groups: u8,

        /// Number of weeks of lessons
        #[arg(short = 'w', long, default_value = "8")]
        weeks: usize,

        /// Monday of the first (numerator) week, YYYY-MM-DD. Defaults to two weeks ago.
        #[arg(long, value_parser = parse_monday)]
        start: Option<NaiveDate>,

        /// Share of lessons written without a week label (0.0 - 1.0)
        #[arg(short = 'u', long, default_value = "0.2")]
        unknown_ratio: f64,
    },
    /// Delete all schedule data
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn parse_monday(value: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", value, e))?;
    if date.weekday() != Weekday::Mon {
        return Err(format!("{} is a {}, not a Monday", date, date.weekday()));
    }
    Ok(date)
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed {
            faculties,
            departments,
            teachers,
            buildings,
            auditoriums,
            courses,
            groups,
            weeks,
            start,
            unknown_ratio,
        } => {
            let defaults = SeedConfig::default();
            let config = SeedConfig {
                faculties,
                departments_per_faculty: departments,
                teachers,
                buildings,
                auditoriums_per_building: auditoriums,
                courses,
                groups_per_course: groups,
                weeks,
                start_monday: start.unwrap_or(defaults.start_monday),
                unknown_ratio,
            };
            handle_seed(&pool, config).await
        }
        Commands::Clear { yes } => handle_clear(&pool, yes).await,
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, config: SeedConfig) {
    if !(0.0..=1.0).contains(&config.unknown_ratio) {
        eprintln!("❌ --unknown-ratio must be between 0.0 and 1.0");
        std::process::exit(1);
    }

    match seeder::seed_all(pool, &config).await {
        Ok(summary) => {
            println!(
                "   {} groups, {} teachers, {} auditoriums, {} lessons",
                summary.groups, summary.teachers, summary.auditoriums, summary.lessons
            );
            flush_cache().await;
        }
        Err(e) => {
            eprintln!("❌ Failed to seed database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear(pool: &sqlx::postgres::PgPool, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete ALL faculties, groups, teachers, auditoriums and lessons?")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("Aborted.");
            return;
        }
    }

    match seeder::clear_all(pool).await {
        Ok(_) => {
            flush_cache().await;
            println!("✅ Schedule data cleared successfully!");
        }
        Err(e) => {
            eprintln!("❌ Failed to clear data: {}", e);
            std::process::exit(1);
        }
    }
}

/// Served schedules are stale once the tables change.
async fn flush_cache() {
    let config = CacheConfig::from_env();
    let Some(url) = config.redis_url.as_deref() else {
        return;
    };

    match RedisCache::new(url, config.default_ttl()).await {
        Ok(cache) => {
            let deleted = invalidate::all(Some(&cache)).await;
            println!("🧹 Invalidated {} cached entries", deleted);
        }
        Err(e) => eprintln!("⚠️  Could not reach Redis, cached schedules may be stale: {}", e),
    }
}
