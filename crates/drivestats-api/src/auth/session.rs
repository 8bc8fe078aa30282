/// Session resolution for incoming requests
///
/// A request carries its token either in the `fast_api_token` cookie or in
/// an `Authorization: Bearer` header. The cookie wins when both are present.
/// Resolution never fails: a missing, malformed, expired or revoked token
/// simply yields an anonymous request, and only `require_auth` turns that
/// into a 401.
use super::jwt::{decode_token, Claims, JwtConfig};
use super::revocation::RevocationList;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Name of the HTTP-only cookie carrying the session token
pub const SESSION_COOKIE: &str = "fast_api_token";

/// Authenticated identity, added to request extensions by `session_middleware`
///
/// Extract it in handlers with `Extension<SessionUser>`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    /// Token id, used for revocation on sign-out
    pub jti: String,
    /// Token expiry (Unix seconds)
    pub expires_at: u64,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user.id,
            username: claims.user.username,
            email: claims.user.email,
            jti: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Raw token the current session was resolved from
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Pull the raw token out of the request headers
///
/// The cookie is preferred. The header must use the case-sensitive
/// `Bearer ` scheme; anything else counts as no token.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Resolve the caller's identity, or `None` for an anonymous request
pub fn resolve_session(
    headers: &HeaderMap,
    config: &JwtConfig,
    revocations: &RevocationList,
) -> Option<(SessionUser, String)> {
    let token = extract_token(headers)?;
    let claims = decode_token(config, &token)?;

    if revocations.is_revoked(&claims.jti) {
        tracing::debug!(jti = %claims.jti, "Rejected revoked session token");
        return None;
    }

    Some((SessionUser::from(claims), token))
}

/// Build the session cookie for a freshly issued token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Expired, empty session cookie that makes the browser drop its copy
///
/// Added to the jar rather than removed from it so the `Set-Cookie` header is
/// sent even when the request carried a bearer header instead of the cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Resolve the session once per request
///
/// On success `SessionUser` and `SessionToken` are inserted into the request
/// extensions. Anonymous requests pass through untouched.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some((user, token)) =
        resolve_session(request.headers(), &state.jwt, &state.revocations)
    {
        request.extensions_mut().insert(user);
        request.extensions_mut().insert(SessionToken(token));
    }

    next.run(request).await
}

/// Reject anonymous requests with 401
///
/// Must be layered inside `session_middleware`.
pub async fn require_auth(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<SessionUser>().is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{issue_token, TokenUser};
    use axum::http::HeaderValue;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "session-test-secret".to_string(),
            expiration_secs: 3600,
        }
    }

    fn token_for(username: &str, id: i32) -> String {
        issue_token(
            &config(),
            &TokenUser {
                id,
                username: username.to_string(),
                email: None,
            },
        )
        .unwrap()
    }

    fn headers(cookie: Option<&str>, authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = cookie {
            headers.insert(
                header::COOKIE,
                HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).unwrap(),
            );
        }
        if let Some(value) = authorization {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_no_token_is_anonymous() {
        let revocations = RevocationList::new();
        assert!(resolve_session(&HeaderMap::new(), &config(), &revocations).is_none());
    }

    #[test]
    fn test_bearer_header() {
        let token = token_for("alice", 1);
        let headers = headers(None, Some(&format!("Bearer {token}")));

        let (user, raw) = resolve_session(&headers, &config(), &RevocationList::new()).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.id, 1);
        assert_eq!(raw, token);
    }

    #[test]
    fn test_cookie_beats_header() {
        let cookie_token = token_for("alice", 1);
        let header_token = token_for("bob", 2);
        let headers = headers(Some(&cookie_token), Some(&format!("Bearer {header_token}")));

        let (user, _) = resolve_session(&headers, &config(), &RevocationList::new()).unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_non_bearer_scheme_is_anonymous() {
        let token = token_for("alice", 1);
        let revocations = RevocationList::new();

        for value in [format!("Basic {token}"), format!("bearer {token}"), token.clone()] {
            let headers = headers(None, Some(&value));
            assert!(resolve_session(&headers, &config(), &revocations).is_none());
        }
    }

    #[test]
    fn test_invalid_token_is_anonymous() {
        let headers = headers(Some("not-a-jwt"), None);
        assert!(resolve_session(&headers, &config(), &RevocationList::new()).is_none());
    }

    #[test]
    fn test_revoked_token_is_anonymous() {
        let token = token_for("alice", 1);
        let headers = headers(None, Some(&format!("Bearer {token}")));
        let revocations = RevocationList::new();

        let (user, _) = resolve_session(&headers, &config(), &revocations).unwrap();
        revocations.revoke(&user.jti, user.expires_at);

        assert!(resolve_session(&headers, &config(), &revocations).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), true);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_removal_cookie_is_expired() {
        let cookie = removal_cookie();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert!(cookie.max_age().is_some_and(|age| age.is_zero()));
    }
}
