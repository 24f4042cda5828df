//! # Timetable Config
//!
//! Configuration types for the Timetable API, loaded from environment variables:
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: per-IP rate limiting
//! - [`schedule`]: lesson store timeout, listing window, local clock and week anchor
//! - [`server`]: bind address
//!
//! # Example
//!
//! ```ignore
//! use timetable_config::{CorsConfig, RateLimitConfig, ScheduleConfig, ServerConfig};
//!
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let schedule_config = ScheduleConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod rate_limit;
pub mod schedule;
pub mod server;

pub use cors::CorsConfig;
pub use rate_limit::RateLimitConfig;
pub use schedule::ScheduleConfig;
pub use server::ServerConfig;
