//! Vehicle statistics handlers
//!
//! Routes keyed by `vehicle_id` check ownership of that vehicle. Routes keyed
//! by `stat_id` load the stat first and check ownership of its vehicle.

use crate::auth::ownership::require_vehicle_owner;
use crate::auth::session::SessionUser;
use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::vehicle_stats::{VehicleStat, VehicleStatIn};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

fn stat_not_found() -> AppError {
    AppError::NotFound("Vehicle stats not found.".into())
}

async fn load_owned_stat(
    state: &AppState,
    user: &SessionUser,
    stat_id: i32,
) -> Result<VehicleStat, AppError> {
    let stat = state
        .vehicle_stats()
        .get_by_id(stat_id)
        .await?
        .ok_or_else(stat_not_found)?;

    require_vehicle_owner(&state.vehicles(), user, stat.vehicle_id).await?;
    Ok(stat)
}

/// Record a new set of readings for a vehicle
#[utoipa::path(
    post,
    path = "/vehicle_stats/{vehicle_id}",
    tag = "vehicle_stats",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    request_body = VehicleStatIn,
    responses(
        (status = 200, description = "Stat recorded", body = VehicleStat),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_stat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<VehicleStatIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    let stat = validated(payload)?;
    require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;

    let created = state.vehicle_stats().create(vehicle_id, &stat).await?;
    Ok(Json(created))
}

/// Current stat for a vehicle
#[utoipa::path(
    get,
    path = "/vehicle_stats/{vehicle_id}",
    tag = "vehicle_stats",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Most recent stat", body = VehicleStat),
        (status = 404, description = "No vehicle or no stats yet", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_latest_stat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;

    let stat = state
        .vehicle_stats()
        .get_latest(vehicle_id)
        .await?
        .ok_or_else(stat_not_found)?;

    Ok(Json(stat))
}

/// Full stat history for a vehicle, newest first
#[utoipa::path(
    get,
    path = "/vehicle_stats/all/{vehicle_id}",
    tag = "vehicle_stats",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Stat history", body = Vec<VehicleStat>),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;

    let stats = state.vehicle_stats().list_by_vehicle(vehicle_id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    put,
    path = "/vehicle_stats/entry/{stat_id}",
    tag = "vehicle_stats",
    params(("stat_id" = i32, Path, description = "Stat id")),
    request_body = VehicleStatIn,
    responses(
        (status = 200, description = "Stat updated", body = VehicleStat),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such stat", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_stat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<VehicleStatIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(stat_id) = path?;
    let stat = validated(payload)?;
    load_owned_stat(&state, &user, stat_id).await?;

    let updated = state
        .vehicle_stats()
        .update(stat_id, &stat)
        .await?
        .ok_or_else(stat_not_found)?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/vehicle_stats/entry/{stat_id}",
    tag = "vehicle_stats",
    params(("stat_id" = i32, Path, description = "Stat id")),
    responses(
        (status = 200, description = "Deleted stat", body = VehicleStat),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such stat", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_stat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(stat_id) = path?;
    load_owned_stat(&state, &user, stat_id).await?;

    let deleted = state
        .vehicle_stats()
        .delete(stat_id)
        .await?
        .ok_or_else(stat_not_found)?;

    Ok(Json(deleted))
}
