//! Application state management

use crate::auth::jwt::JwtConfig;
use crate::auth::revocation::RevocationList;
use crate::store::{
    AccountStore, BugReportStore, MaintenanceStore, NewsletterStore, VehicleStatStore,
    VehicleStore,
};
use drivestats_core::{AppConfig, DatabaseConfig};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Token signing settings derived from `config.auth`
    pub jwt: JwtConfig,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Signed-out token ids
    pub revocations: RevocationList,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        Self {
            config,
            jwt,
            db_pool,
            revocations: RevocationList::new(),
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.db_pool.clone())
    }

    pub fn vehicles(&self) -> VehicleStore {
        VehicleStore::new(self.db_pool.clone())
    }

    pub fn vehicle_stats(&self) -> VehicleStatStore {
        VehicleStatStore::new(self.db_pool.clone())
    }

    pub fn maintenance(&self) -> MaintenanceStore {
        MaintenanceStore::new(self.db_pool.clone())
    }

    pub fn bug_reports(&self) -> BugReportStore {
        BugReportStore::new(self.db_pool.clone())
    }

    pub fn newsletter(&self) -> NewsletterStore {
        NewsletterStore::new(self.db_pool.clone())
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
}

/// Open the pool and wait for a first connection
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect(&config.url).await
}

/// Build the pool without connecting; connections open on first use
pub fn lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect_lazy(&config.url)
}
