//! Account lookup and password change handlers

use crate::audit::{audit_log, extract_ip_address, AuditEvent};
use crate::auth::session::SessionUser;
use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::accounts::{AccountOut, UpdatePasswordRequest};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Username availability check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckUserResponse {
    pub username: String,
    pub email: String,
}

/// Email availability check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckEmailResponse {
    pub email: String,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found.".into())
}

/// Get an account by username
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "accounts",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Account found", body = AccountOut),
        (status = 404, description = "No such user", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .accounts()
        .get_by_username(&username)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(AccountOut::from(account)))
}

/// Check whether a username is taken
#[utoipa::path(
    get,
    path = "/check/users/{username}",
    tag = "accounts",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Username taken", body = CheckUserResponse),
        (status = 404, description = "Username free", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .accounts()
        .get_by_username(&username)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(CheckUserResponse {
        username: account.username,
        email: account.email,
    }))
}

/// Check whether an email is registered
#[utoipa::path(
    get,
    path = "/check/email/{email}",
    tag = "accounts",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "Email registered", body = CheckEmailResponse),
        (status = 404, description = "Email free", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .accounts()
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found.".into()))?;

    Ok(Json(CheckEmailResponse {
        email: account.email,
    }))
}

/// Change the caller's password
///
/// The current password must be supplied. Only the signed-in account may be
/// changed.
#[utoipa::path(
    put,
    path = "/account/update-password",
    tag = "accounts",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AccountOut),
        (status = 403, description = "Wrong current password or other account", body = crate::error::ApiError),
        (status = 404, description = "No such user", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    headers: HeaderMap,
    payload: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = validated(payload)?;
    let ip_address = extract_ip_address(&headers);

    if request.username.trim().to_lowercase() != user.username {
        audit_log(&AuditEvent::AccessDenied {
            user_id: user.id,
            resource: format!("account:{}", request.username),
            ip_address,
        });
        return Err(AppError::Forbidden(
            "You can only change your own password.".into(),
        ));
    }

    let result = state
        .accounts()
        .update_password(&request.username, &request.old_password, &request.new_password)
        .await;

    audit_log(&AuditEvent::PasswordChange {
        username: user.username,
        success: result.is_ok(),
        ip_address,
    });

    Ok(Json(AccountOut::from(result?)))
}
