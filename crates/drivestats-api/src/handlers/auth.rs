//! Authentication API handlers
//!
//! Signup and sign-in issue a session token, return it in the body and set
//! it as the `fast_api_token` cookie. Sign-out revokes the presented token
//! and removes the cookie.

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::jwt::{issue_token, TokenUser};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{removal_cookie, session_cookie, SessionToken, SessionUser};
use crate::error::{validated, AppError};
use crate::state::AppState;
use crate::store::accounts::{Account, AccountOut, NewAccount, SignupRequest};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::HeaderMap,
    response::IntoResponse,
    Extension, Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Sign-in form (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
}

/// Sign-in response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub username: String,
    pub access_token: String,
    pub token_type: String,
}

/// Current session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub token: String,
}

/// Sign-out response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn token_user(account: &Account) -> TokenUser {
    TokenUser {
        id: account.id,
        username: account.username.clone(),
        email: Some(account.email.clone()),
    }
}

/// Register a new account
///
/// Username and email are stored lower-cased. A session cookie is set so the
/// new user is signed in immediately.
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AccountOut),
        (status = 400, description = "Malformed body", body = crate::error::ApiError),
        (status = 422, description = "Invalid input", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = validated(payload)?;
    let ip_address = extract_ip_address(&headers);

    let new_account = NewAccount {
        username: request.username.clone(),
        email: request.email,
        password_hash: hash_password(&request.password)?,
    };

    let account = match state.accounts().create(&new_account).await {
        Ok(account) => account,
        Err(e) => {
            audit_log(&AuditEvent::SignupFailure {
                username: request.username,
                reason: e.to_string(),
                ip_address,
            });
            return Err(e.into());
        }
    };

    let token = issue_token(&state.jwt, &token_user(&account))?;

    audit_log(&AuditEvent::SignupSuccess {
        user_id: account.id,
        username: account.username.clone(),
        ip_address,
    });

    let jar = jar.add(session_cookie(token, state.config.server.cookie_secure));
    Ok((jar, Json(AccountOut::from(account))))
}

/// Sign in with username and password
///
/// Takes a form body with `username` and `password` fields.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body(content = SignInForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Incorrect username or password", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn signin_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    form: Result<Form<SignInForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form?;
    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);

    let account = state.accounts().get_by_username(&form.username).await?;

    let account = match account {
        Some(account) if verify_password(&form.password, &account.password) => account,
        _ => {
            audit_log(&AuditEvent::SignInFailure {
                username: form.username,
                ip_address,
                user_agent,
            });
            return Err(AppError::Unauthorized);
        }
    };

    let token = issue_token(&state.jwt, &token_user(&account))?;

    audit_log(&AuditEvent::SignInSuccess {
        user_id: account.id,
        username: account.username.clone(),
        ip_address,
        user_agent,
    });

    let jar = jar.add(session_cookie(token.clone(), state.config.server.cookie_secure));
    Ok((
        jar,
        Json(TokenResponse {
            username: account.username,
            access_token: token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

/// Return the identity behind the current session
#[utoipa::path(
    get,
    path = "/auth/authenticate",
    tag = "auth",
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Not signed in", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn authenticate_handler(
    Extension(user): Extension<SessionUser>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(SessionResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    }))
}

/// Sign out
///
/// Works without a session too; the cookie is removed either way.
#[utoipa::path(
    delete,
    path = "/auth/signout",
    tag = "auth",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
    )
)]
pub async fn signout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    user: Option<Extension<SessionUser>>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(Extension(user)) = user {
        state.revocations.revoke(&user.jti, user.expires_at);

        audit_log(&AuditEvent::SignOut {
            user_id: user.id,
            username: user.username,
            ip_address: extract_ip_address(&headers),
        });
    }

    Ok((
        jar.add(removal_cookie()),
        Json(MessageResponse {
            message: "Successfully logged out".to_string(),
        }),
    ))
}
