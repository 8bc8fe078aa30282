//! Maintenance log persistence
//!
//! Logs are listed by the user-supplied `service_date`, newest first; ties
//! fall back to insertion order.

use super::StoreResult;
use chrono::{DateTime, NaiveDate, Utc};
use drivestats_core::to_local_date;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use validator::Validate;

const COLUMNS: &str =
    "id, vehicle_id, maintenance_type, mileage, cost, description, service_date, created_date";

#[derive(Debug, Clone, FromRow)]
struct MaintenanceLogRow {
    id: i32,
    vehicle_id: i32,
    maintenance_type: String,
    mileage: i32,
    cost: i32,
    description: String,
    service_date: NaiveDate,
    created_date: DateTime<Utc>,
}

/// Maintenance log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceLog {
    pub id: i32,
    pub vehicle_id: i32,
    pub maintenance_type: String,
    pub mileage: i32,
    pub cost: i32,
    pub description: String,
    pub service_date: NaiveDate,
    /// Creation date in US Pacific time
    pub created_date: NaiveDate,
}

impl From<MaintenanceLogRow> for MaintenanceLog {
    fn from(row: MaintenanceLogRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            maintenance_type: row.maintenance_type,
            mileage: row.mileage,
            cost: row.cost,
            description: row.description,
            service_date: row.service_date,
            created_date: to_local_date(row.created_date),
        }
    }
}

/// Create/update request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MaintenanceLogIn {
    #[validate(length(min = 1, max = 100))]
    pub maintenance_type: String,
    #[validate(range(min = 0))]
    pub mileage: i32,
    /// Whole currency units
    #[validate(range(min = 0))]
    pub cost: i32,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub service_date: NaiveDate,
}

#[derive(Clone)]
pub struct MaintenanceStore {
    pool: PgPool,
}

impl MaintenanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle_id: i32, log: &MaintenanceLogIn) -> StoreResult<MaintenanceLog> {
        let row = sqlx::query_as::<_, MaintenanceLogRow>(&format!(
            "INSERT INTO vehicle_maintenance \
             (vehicle_id, maintenance_type, mileage, cost, description, service_date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(vehicle_id)
        .bind(&log.maintenance_type)
        .bind(log.mileage)
        .bind(log.cost)
        .bind(&log.description)
        .bind(log.service_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<MaintenanceLog>> {
        let row = sqlx::query_as::<_, MaintenanceLogRow>(&format!(
            "SELECT {COLUMNS} FROM vehicle_maintenance WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn list_by_vehicle(&self, vehicle_id: i32) -> StoreResult<Vec<MaintenanceLog>> {
        let rows = sqlx::query_as::<_, MaintenanceLogRow>(&format!(
            "SELECT {COLUMNS} FROM vehicle_maintenance WHERE vehicle_id = $1 \
             ORDER BY service_date DESC, id DESC"
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Log with the latest service date for a vehicle
    pub async fn get_latest(&self, vehicle_id: i32) -> StoreResult<Option<MaintenanceLog>> {
        let row = sqlx::query_as::<_, MaintenanceLogRow>(&format!(
            "SELECT {COLUMNS} FROM vehicle_maintenance WHERE vehicle_id = $1 \
             ORDER BY service_date DESC, id DESC LIMIT 1"
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn update(&self, id: i32, log: &MaintenanceLogIn) -> StoreResult<Option<MaintenanceLog>> {
        let row = sqlx::query_as::<_, MaintenanceLogRow>(&format!(
            "UPDATE vehicle_maintenance SET maintenance_type = $1, mileage = $2, cost = $3, \
             description = $4, service_date = $5 WHERE id = $6 RETURNING {COLUMNS}"
        ))
        .bind(&log.maintenance_type)
        .bind(log.mileage)
        .bind(log.cost)
        .bind(&log.description)
        .bind(log.service_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn delete(&self, id: i32) -> StoreResult<Option<MaintenanceLog>> {
        let row = sqlx::query_as::<_, MaintenanceLogRow>(&format!(
            "DELETE FROM vehicle_maintenance WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
