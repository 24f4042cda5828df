//! # Timetable CLI
//!
//! Database seeding utilities for Timetable development and load testing.
//!
//! ## Usage
//!
//! ```ignore
//! use timetable_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default();
//! seed_all(&pool, &config).await?;
//! ```

pub mod seeder;
