//! Vehicle persistence

use super::StoreResult;
use chrono::{DateTime, NaiveDate, Utc};
use drivestats_core::to_local_date;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use validator::Validate;

const COLUMNS: &str = "id, user_id, vehicle_name, year, make, model, vin, mileage, about, created_date";

#[derive(Debug, Clone, FromRow)]
struct VehicleRow {
    id: i32,
    user_id: i32,
    vehicle_name: String,
    year: i32,
    make: String,
    model: String,
    vin: String,
    mileage: i32,
    about: Option<String>,
    created_date: DateTime<Utc>,
}

/// Vehicle record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: i32,
    pub user_id: i32,
    pub vehicle_name: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub vin: String,
    pub mileage: i32,
    pub about: Option<String>,
    /// Creation date in US Pacific time
    pub created_date: NaiveDate,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            vehicle_name: row.vehicle_name,
            year: row.year,
            make: row.make,
            model: row.model,
            vin: row.vin,
            mileage: row.mileage,
            about: row.about,
            created_date: to_local_date(row.created_date),
        }
    }
}

/// Create/update request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VehicleIn {
    #[validate(length(min = 1, max = 100))]
    pub vehicle_name: String,
    #[validate(range(min = 1886, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 100))]
    pub make: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(min = 1, max = 100))]
    pub vin: String,
    #[validate(range(min = 0))]
    pub mileage: i32,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub about: Option<String>,
}

#[derive(Clone)]
pub struct VehicleStore {
    pool: PgPool,
}

impl VehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i32, vehicle: &VehicleIn) -> StoreResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "INSERT INTO vehicles (user_id, vehicle_name, year, make, model, vin, mileage, about) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&vehicle.vehicle_name)
        .bind(vehicle.year)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.vin)
        .bind(vehicle.mileage)
        .bind(&vehicle.about)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {COLUMNS} FROM vehicles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Vehicles owned by `user_id`, newest first
    pub async fn list_by_user(&self, user_id: i32) -> StoreResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {COLUMNS} FROM vehicles WHERE user_id = $1 \
             ORDER BY created_date DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: i32, vehicle: &VehicleIn) -> StoreResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "UPDATE vehicles SET vehicle_name = $1, year = $2, make = $3, model = $4, \
             vin = $5, mileage = $6, about = $7 WHERE id = $8 RETURNING {COLUMNS}"
        ))
        .bind(&vehicle.vehicle_name)
        .bind(vehicle.year)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.vin)
        .bind(vehicle.mileage)
        .bind(&vehicle.about)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a vehicle; its stats and logs go with it
    pub async fn delete(&self, id: i32) -> StoreResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "DELETE FROM vehicles WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
