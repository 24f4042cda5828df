//! # Timetable DB
//!
//! PostgreSQL pool construction for the Timetable API.
//!
//! # Example
//!
//! ```ignore
//! use timetable_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool(Duration::from_secs(10)).await;
//! }
//! ```

use std::env;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// `acquire_timeout` bounds how long a query waits for a free connection, so a
/// saturated pool surfaces as an error instead of a hung request. The pool size
/// comes from `DATABASE_MAX_CONNECTIONS` (default 10).
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable at startup.
pub async fn init_db_pool(acquire_timeout: Duration) -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
