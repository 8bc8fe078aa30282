//! Maintenance log handlers

use crate::auth::ownership::require_vehicle_owner;
use crate::auth::session::SessionUser;
use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::maintenance::{MaintenanceLog, MaintenanceLogIn};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

fn log_not_found() -> AppError {
    AppError::NotFound("Maintenance log not found.".into())
}

async fn load_owned_log(
    state: &AppState,
    user: &SessionUser,
    log_id: i32,
) -> Result<MaintenanceLog, AppError> {
    let log = state
        .maintenance()
        .get_by_id(log_id)
        .await?
        .ok_or_else(log_not_found)?;

    require_vehicle_owner(&state.vehicles(), user, log.vehicle_id).await?;
    Ok(log)
}

#[utoipa::path(
    post,
    path = "/vehicle-maintenance/create/{vehicle_id}",
    tag = "maintenance",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    request_body = MaintenanceLogIn,
    responses(
        (status = 200, description = "Log created", body = MaintenanceLog),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MaintenanceLogIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    let log = validated(payload)?;
    require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;

    let created = state.maintenance().create(vehicle_id, &log).await?;
    Ok(Json(created))
}

/// Logs for a vehicle by service date, newest first
#[utoipa::path(
    get,
    path = "/vehicle-maintenance/vehicle/{vehicle_id}",
    tag = "maintenance",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Maintenance logs", body = Vec<MaintenanceLog>),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;

    let logs = state.maintenance().list_by_vehicle(vehicle_id).await?;
    Ok(Json(logs))
}

#[utoipa::path(
    get,
    path = "/vehicle-maintenance/latest/{vehicle_id}",
    tag = "maintenance",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Most recent log", body = MaintenanceLog),
        (status = 404, description = "No vehicle or no logs yet", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_latest_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;

    let log = state
        .maintenance()
        .get_latest(vehicle_id)
        .await?
        .ok_or_else(log_not_found)?;

    Ok(Json(log))
}

#[utoipa::path(
    get,
    path = "/vehicle-maintenance/{log_id}",
    tag = "maintenance",
    params(("log_id" = i32, Path, description = "Log id")),
    responses(
        (status = 200, description = "Maintenance log", body = MaintenanceLog),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such log", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(log_id) = path?;
    let log = load_owned_log(&state, &user, log_id).await?;
    Ok(Json(log))
}

#[utoipa::path(
    put,
    path = "/vehicle-maintenance/{log_id}",
    tag = "maintenance",
    params(("log_id" = i32, Path, description = "Log id")),
    request_body = MaintenanceLogIn,
    responses(
        (status = 200, description = "Log updated", body = MaintenanceLog),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such log", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MaintenanceLogIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(log_id) = path?;
    let log = validated(payload)?;
    load_owned_log(&state, &user, log_id).await?;

    let updated = state
        .maintenance()
        .update(log_id, &log)
        .await?
        .ok_or_else(log_not_found)?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/vehicle-maintenance/{log_id}",
    tag = "maintenance",
    params(("log_id" = i32, Path, description = "Log id")),
    responses(
        (status = 200, description = "Deleted log", body = MaintenanceLog),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such log", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(log_id) = path?;
    load_owned_log(&state, &user, log_id).await?;

    let deleted = state
        .maintenance()
        .delete(log_id)
        .await?
        .ok_or_else(log_not_found)?;

    Ok(Json(deleted))
}
