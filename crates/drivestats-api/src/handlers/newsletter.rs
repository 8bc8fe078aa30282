//! Newsletter subscription handlers (public)

use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::newsletter::{Subscriber, SubscriberIn};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/subscribe-email",
    tag = "newsletter",
    request_body = SubscriberIn,
    responses(
        (status = 200, description = "Subscribed", body = Subscriber),
        (status = 400, description = "Already subscribed", body = crate::error::ApiError),
        (status = 422, description = "Invalid email", body = crate::error::ApiError),
    )
)]
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscriberIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = validated(payload)?;

    let subscriber = state
        .newsletter()
        .create(&request.subscriber_email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Email is already subscribed.".into()))?;

    Ok(Json(subscriber))
}

#[utoipa::path(
    delete,
    path = "/subscribe-email",
    tag = "newsletter",
    request_body = SubscriberIn,
    responses(
        (status = 200, description = "Unsubscribed", body = Subscriber),
        (status = 404, description = "Not subscribed", body = crate::error::ApiError),
    )
)]
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscriberIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = validated(payload)?;

    let removed = state
        .newsletter()
        .delete_by_email(&request.subscriber_email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email is not subscribed.".into()))?;

    Ok(Json(removed))
}
