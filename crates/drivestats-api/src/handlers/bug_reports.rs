//! Bug report handlers
//!
//! Reports are private to the account that filed them.

use crate::auth::ownership::ensure_owner;
use crate::auth::session::SessionUser;
use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::bug_reports::{BugReport, BugReportIn};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

fn report_not_found() -> AppError {
    AppError::NotFound("Bug report not found.".into())
}

async fn load_owned_report(
    state: &AppState,
    user: &SessionUser,
    report_id: i32,
) -> Result<BugReport, AppError> {
    let report = state
        .bug_reports()
        .get_by_id(report_id)
        .await?
        .ok_or_else(report_not_found)?;

    ensure_owner(user, &report)?;
    Ok(report)
}

#[utoipa::path(
    post,
    path = "/bug_report",
    tag = "bug_reports",
    request_body = BugReportIn,
    responses(
        (status = 200, description = "Report filed", body = BugReport),
        (status = 401, description = "Not signed in", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<BugReportIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let report = validated(payload)?;
    let created = state.bug_reports().create(user.id, &report).await?;

    tracing::info!(report_id = created.id, user_id = user.id, "Bug report filed");
    Ok(Json(created))
}

#[utoipa::path(
    get,
    path = "/bug_report",
    tag = "bug_reports",
    responses(
        (status = 200, description = "Caller's reports, newest first", body = Vec<BugReport>),
        (status = 401, description = "Not signed in", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<impl IntoResponse, AppError> {
    let reports = state.bug_reports().list_by_user(user.id).await?;
    Ok(Json(reports))
}

#[utoipa::path(
    get,
    path = "/bug_report/{report_id}",
    tag = "bug_reports",
    params(("report_id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Bug report", body = BugReport),
        (status = 403, description = "Filed by another account", body = crate::error::ApiError),
        (status = 404, description = "No such report", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(report_id) = path?;
    let report = load_owned_report(&state, &user, report_id).await?;
    Ok(Json(report))
}

#[utoipa::path(
    put,
    path = "/bug_report/{report_id}",
    tag = "bug_reports",
    params(("report_id" = i32, Path, description = "Report id")),
    request_body = BugReportIn,
    responses(
        (status = 200, description = "Report updated", body = BugReport),
        (status = 403, description = "Filed by another account", body = crate::error::ApiError),
        (status = 404, description = "No such report", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BugReportIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(report_id) = path?;
    let report = validated(payload)?;
    load_owned_report(&state, &user, report_id).await?;

    let updated = state
        .bug_reports()
        .update(report_id, &report)
        .await?
        .ok_or_else(report_not_found)?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/bug_report/{report_id}",
    tag = "bug_reports",
    params(("report_id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Deleted report", body = BugReport),
        (status = 403, description = "Filed by another account", body = crate::error::ApiError),
        (status = 404, description = "No such report", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(report_id) = path?;
    load_owned_report(&state, &user, report_id).await?;

    let deleted = state
        .bug_reports()
        .delete(report_id)
        .await?
        .ok_or_else(report_not_found)?;

    Ok(Json(deleted))
}
