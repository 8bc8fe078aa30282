//! API error handling
//!
//! Every handler returns `Result<_, AppError>`. The error renders as a JSON
//! `{ code, message }` body with the matching status. Internal and database
//! failures are logged with their cause and reported to the client without it.

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Field-level details for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED", "Authentication required")
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Well-formed body that fails schema validation (422)
    Validation(String),
    Unauthorized,
    Forbidden(String),
    Internal(String),
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Validation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ApiError::unauthorized()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("DATABASE_ERROR", "Database operation failed"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e.to_string()),
            StoreError::NotFound(what) => AppError::NotFound(format!("{what} not found.")),
            StoreError::InvalidCredentials => AppError::Forbidden("Invalid old password.".into()),
            StoreError::Validation(msg) => AppError::Validation(msg),
            StoreError::Password(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        AppError::Internal(format!("Token error: {err}"))
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Parses as JSON but does not fit the request type
            JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::FailedToDeserializeFormBody(e) => AppError::Validation(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            // e.g. `/vehicles/abc` for an integer id
            PathRejection::FailedToDeserializePathParams(e) => AppError::BadRequest(e.body_text()),
            other => AppError::Internal(other.body_text()),
        }
    }
}

/// Unwrap a JSON body and run its validation rules
///
/// Handlers take `Result<Json<T>, JsonRejection>` so a malformed body maps to
/// 400 and a failed rule maps to 422 through the same error type.
pub fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(value) = payload?;
    value.validate()?;
    Ok(value)
}
