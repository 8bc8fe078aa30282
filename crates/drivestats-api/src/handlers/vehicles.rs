//! Vehicle handlers

use crate::audit::{audit_log, AuditEvent};
use crate::auth::ownership::require_vehicle_owner;
use crate::auth::session::SessionUser;
use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::vehicles::{Vehicle, VehicleIn};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

fn vehicle_not_found() -> AppError {
    AppError::NotFound("Vehicle not found.".into())
}

/// Create a vehicle owned by the caller
#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    request_body = VehicleIn,
    responses(
        (status = 200, description = "Vehicle created", body = Vehicle),
        (status = 401, description = "Not signed in", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<VehicleIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = validated(payload)?;
    let created = state.vehicles().create(user.id, &vehicle).await?;

    tracing::info!(vehicle_id = created.id, user_id = user.id, "Vehicle created");
    Ok(Json(created))
}

/// List the caller's vehicles, newest first
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    responses(
        (status = 200, description = "Caller's vehicles", body = Vec<Vehicle>),
        (status = 401, description = "Not signed in", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = state.vehicles().list_by_user(user.id).await?;
    Ok(Json(vehicles))
}

/// List vehicles of one account; only the account itself may ask
#[utoipa::path(
    get,
    path = "/vehicles/user/{user_id}",
    tag = "vehicles",
    params(("user_id" = i32, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account's vehicles", body = Vec<Vehicle>),
        (status = 403, description = "Another account", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_user_vehicles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(user_id) = path?;
    if user_id != user.id {
        audit_log(&AuditEvent::AccessDenied {
            user_id: user.id,
            resource: format!("vehicles:user:{user_id}"),
            ip_address: None,
        });
        return Err(AppError::Forbidden(
            "You can only list your own vehicles.".into(),
        ));
    }

    let vehicles = state.vehicles().list_by_user(user_id).await?;
    Ok(Json(vehicles))
}

#[utoipa::path(
    get,
    path = "/vehicles/{vehicle_id}",
    tag = "vehicles",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle", body = Vehicle),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    let vehicle = require_vehicle_owner(&state.vehicles(), &user, vehicle_id).await?;
    Ok(Json(vehicle))
}

#[utoipa::path(
    put,
    path = "/vehicles/{vehicle_id}",
    tag = "vehicles",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    request_body = VehicleIn,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<VehicleIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    let vehicle = validated(payload)?;
    let store = state.vehicles();
    require_vehicle_owner(&store, &user, vehicle_id).await?;

    let updated = store
        .update(vehicle_id, &vehicle)
        .await?
        .ok_or_else(vehicle_not_found)?;

    Ok(Json(updated))
}

/// Delete a vehicle with all of its stats and maintenance logs
#[utoipa::path(
    delete,
    path = "/vehicles/{vehicle_id}",
    tag = "vehicles",
    params(("vehicle_id" = i32, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Deleted vehicle", body = Vehicle),
        (status = 403, description = "Not the owner", body = crate::error::ApiError),
        (status = 404, description = "No such vehicle", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(vehicle_id) = path?;
    let store = state.vehicles();
    require_vehicle_owner(&store, &user, vehicle_id).await?;

    let deleted = store
        .delete(vehicle_id)
        .await?
        .ok_or_else(vehicle_not_found)?;

    tracing::info!(vehicle_id, user_id = user.id, "Vehicle deleted");
    Ok(Json(deleted))
}
