//! Shared utilities.
//!
//! - [`dates`]: week starts, query windows, reference date parsing
//! - [`tracing`]: span macros and outcome recording

pub mod dates;
pub mod tracing;
