//! Vehicle service statistics
//!
//! Each row records the odometer reading at which every service item was
//! last done. A vehicle accumulates rows over time; the current stat is the
//! row with the most recent `last_update`.

use super::StoreResult;
use chrono::{DateTime, FixedOffset, Utc};
use drivestats_core::to_local;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use validator::Validate;

const COLUMNS: &str = "id, vehicle_id, oil_change, tire_rotation, tire_change, air_filter, \
    brake_flush, brake_rotor, brake_pad, coolant_flush, transmission_fluid_flush, \
    cabin_filter, wiper_blades, last_update";

#[derive(Debug, Clone, FromRow)]
struct VehicleStatRow {
    id: i32,
    vehicle_id: i32,
    oil_change: Option<i32>,
    tire_rotation: Option<i32>,
    tire_change: Option<i32>,
    air_filter: Option<i32>,
    brake_flush: Option<i32>,
    brake_rotor: Option<i32>,
    brake_pad: Option<i32>,
    coolant_flush: Option<i32>,
    transmission_fluid_flush: Option<i32>,
    cabin_filter: Option<i32>,
    wiper_blades: Option<i32>,
    last_update: DateTime<Utc>,
}

/// Service statistics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleStat {
    pub id: i32,
    pub vehicle_id: i32,
    pub oil_change: Option<i32>,
    pub tire_rotation: Option<i32>,
    pub tire_change: Option<i32>,
    pub air_filter: Option<i32>,
    pub brake_flush: Option<i32>,
    pub brake_rotor: Option<i32>,
    pub brake_pad: Option<i32>,
    pub coolant_flush: Option<i32>,
    pub transmission_fluid_flush: Option<i32>,
    pub cabin_filter: Option<i32>,
    pub wiper_blades: Option<i32>,
    /// Time of the last write, US Pacific
    #[schema(value_type = String, format = DateTime)]
    pub last_update: DateTime<FixedOffset>,
}

impl From<VehicleStatRow> for VehicleStat {
    fn from(row: VehicleStatRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            oil_change: row.oil_change,
            tire_rotation: row.tire_rotation,
            tire_change: row.tire_change,
            air_filter: row.air_filter,
            brake_flush: row.brake_flush,
            brake_rotor: row.brake_rotor,
            brake_pad: row.brake_pad,
            coolant_flush: row.coolant_flush,
            transmission_fluid_flush: row.transmission_fluid_flush,
            cabin_filter: row.cabin_filter,
            wiper_blades: row.wiper_blades,
            last_update: to_local(row.last_update),
        }
    }
}

/// Create/update request body; every reading is optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct VehicleStatIn {
    #[validate(range(min = 0))]
    pub oil_change: Option<i32>,
    #[validate(range(min = 0))]
    pub tire_rotation: Option<i32>,
    #[validate(range(min = 0))]
    pub tire_change: Option<i32>,
    #[validate(range(min = 0))]
    pub air_filter: Option<i32>,
    #[validate(range(min = 0))]
    pub brake_flush: Option<i32>,
    #[validate(range(min = 0))]
    pub brake_rotor: Option<i32>,
    #[validate(range(min = 0))]
    pub brake_pad: Option<i32>,
    #[validate(range(min = 0))]
    pub coolant_flush: Option<i32>,
    #[validate(range(min = 0))]
    pub transmission_fluid_flush: Option<i32>,
    #[validate(range(min = 0))]
    pub cabin_filter: Option<i32>,
    #[validate(range(min = 0))]
    pub wiper_blades: Option<i32>,
}

#[derive(Clone)]
pub struct VehicleStatStore {
    pool: PgPool,
}

impl VehicleStatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle_id: i32, stat: &VehicleStatIn) -> StoreResult<VehicleStat> {
        let row = sqlx::query_as::<_, VehicleStatRow>(&format!(
            "INSERT INTO vehicle_stats (vehicle_id, oil_change, tire_rotation, tire_change, \
             air_filter, brake_flush, brake_rotor, brake_pad, coolant_flush, \
             transmission_fluid_flush, cabin_filter, wiper_blades) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {COLUMNS}"
        ))
        .bind(vehicle_id)
        .bind(stat.oil_change)
        .bind(stat.tire_rotation)
        .bind(stat.tire_change)
        .bind(stat.air_filter)
        .bind(stat.brake_flush)
        .bind(stat.brake_rotor)
        .bind(stat.brake_pad)
        .bind(stat.coolant_flush)
        .bind(stat.transmission_fluid_flush)
        .bind(stat.cabin_filter)
        .bind(stat.wiper_blades)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<VehicleStat>> {
        let row = sqlx::query_as::<_, VehicleStatRow>(&format!(
            "SELECT {COLUMNS} FROM vehicle_stats WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Most recently written stat for a vehicle
    pub async fn get_latest(&self, vehicle_id: i32) -> StoreResult<Option<VehicleStat>> {
        let row = sqlx::query_as::<_, VehicleStatRow>(&format!(
            "SELECT {COLUMNS} FROM vehicle_stats WHERE vehicle_id = $1 \
             ORDER BY last_update DESC, id DESC LIMIT 1"
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// All stats for a vehicle, newest first
    pub async fn list_by_vehicle(&self, vehicle_id: i32) -> StoreResult<Vec<VehicleStat>> {
        let rows = sqlx::query_as::<_, VehicleStatRow>(&format!(
            "SELECT {COLUMNS} FROM vehicle_stats WHERE vehicle_id = $1 \
             ORDER BY last_update DESC, id DESC"
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Overwrite every reading and stamp `last_update` with the current time
    pub async fn update(&self, id: i32, stat: &VehicleStatIn) -> StoreResult<Option<VehicleStat>> {
        let row = sqlx::query_as::<_, VehicleStatRow>(&format!(
            "UPDATE vehicle_stats SET oil_change = $1, tire_rotation = $2, tire_change = $3, \
             air_filter = $4, brake_flush = $5, brake_rotor = $6, brake_pad = $7, \
             coolant_flush = $8, transmission_fluid_flush = $9, cabin_filter = $10, \
             wiper_blades = $11, last_update = NOW() WHERE id = $12 RETURNING {COLUMNS}"
        ))
        .bind(stat.oil_change)
        .bind(stat.tire_rotation)
        .bind(stat.tire_change)
        .bind(stat.air_filter)
        .bind(stat.brake_flush)
        .bind(stat.brake_rotor)
        .bind(stat.brake_pad)
        .bind(stat.coolant_flush)
        .bind(stat.transmission_fluid_flush)
        .bind(stat.cabin_filter)
        .bind(stat.wiper_blades)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn delete(&self, id: i32) -> StoreResult<Option<VehicleStat>> {
        let row = sqlx::query_as::<_, VehicleStatRow>(&format!(
            "DELETE FROM vehicle_stats WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_body_defaults_to_none() {
        let parsed: VehicleStatIn =
            serde_json::from_value(serde_json::json!({ "oil_change": 52000 })).unwrap();

        assert_eq!(parsed.oil_change, Some(52000));
        assert!(parsed.wiper_blades.is_none());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_negative_reading_is_rejected() {
        let stat = VehicleStatIn {
            brake_pad: Some(-5),
            ..Default::default()
        };
        assert!(stat.validate().is_err());
    }
}
