//! DriveStats Core - configuration and shared primitives
//!
//! This crate holds the pieces of the DriveStats backend that do not depend
//! on the HTTP layer or the database driver:
//! - Configuration management
//! - Display time zone conversion

pub mod config;
pub mod time;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use time::{to_local, to_local_date, DISPLAY_TIME_ZONE};
