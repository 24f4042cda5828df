//! # Timetable Core
//!
//! Core types, errors, and utilities for the Timetable API.
//!
//! - [`errors`]: the application error type with HTTP response conversion
//! - [`serde`]: lenient deserializers for query parameters
//!
//! # Example
//!
//! ```ignore
//! use timetable_core::errors::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("schedule for group 344 not found"));
//! ```

pub mod errors;
pub mod serde;

pub use errors::AppError;
