//! PostgreSQL stores, one per entity family
//!
//! Stores hold a cloned `PgPool`, run one parameterized statement per
//! operation and return typed records. They perform no authorization;
//! ownership is checked by the handlers before a store is called. Absence is
//! `Ok(None)`, never an error.

pub mod accounts;
pub mod bug_reports;
pub mod maintenance;
pub mod newsletter;
pub mod vehicle_stats;
pub mod vehicles;

pub use accounts::{Account, AccountStore, NewAccount};
pub use bug_reports::{BugReport, BugReportIn, BugReportStore};
pub use maintenance::{MaintenanceLog, MaintenanceLogIn, MaintenanceStore};
pub use newsletter::{NewsletterStore, Subscriber, SubscriberIn};
pub use vehicle_stats::{VehicleStat, VehicleStatIn, VehicleStatStore};
pub use vehicles::{Vehicle, VehicleIn, VehicleStore};

use crate::auth::password::PasswordError;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

pub type StoreResult<T> = Result<T, StoreError>;
