//! API handlers

pub mod accounts;
pub mod auth;
pub mod bug_reports;
pub mod health;
pub mod maintenance;
pub mod newsletter;
pub mod vehicle_stats;
pub mod vehicles;
