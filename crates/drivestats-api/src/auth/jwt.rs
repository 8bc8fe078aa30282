//! Session token issuance and validation
//!
//! Tokens are HMAC-SHA256 signed JWTs carrying the username as subject, an
//! embedded user object and an absolute expiry. Validation has no leeway:
//! a token is dead the second its `exp` passes.

use drivestats_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// User identity embedded in the claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: i32,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// JWT claim set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username
    pub sub: String,
    /// Embedded user object
    pub user: TokenUser,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Unique token id, used by sign-out revocation
    pub jti: String,
}

/// Token errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token lifetime of {0}s is out of range")]
    ExpiryOutOfRange(u64),

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Token lifetime in seconds (default: 3600 = 1 hour)
    pub expiration_secs: u64,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.signing_key.clone(),
            expiration_secs: auth.token_expiration_secs,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

/// Issue a signed session token for `user`
///
/// # Example
///
/// ```no_run
/// use drivestats_api::auth::jwt::{issue_token, JwtConfig, TokenUser};
///
/// let config = JwtConfig { secret: "change-me".into(), expiration_secs: 3600 };
/// let user = TokenUser { id: 1, username: "alice".into(), email: None };
/// let token = issue_token(&config, &user).expect("Failed to issue token");
/// ```
pub fn issue_token(config: &JwtConfig, user: &TokenUser) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let exp = now
        .checked_add(config.expiration_secs)
        .ok_or(JwtError::ExpiryOutOfRange(config.expiration_secs))?;

    let claims = Claims {
        sub: user.username.clone(),
        user: user.clone(),
        iat: now,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a token and extract its claims
///
/// Fails on a bad signature, a passed expiry or a missing `exp`/`sub` claim.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Decode a token, treating every failure as "no session"
///
/// A broken token and a missing token mean the same thing to callers, so
/// the reason is only logged.
pub fn decode_token(config: &JwtConfig, token: &str) -> Option<Claims> {
    match validate_token(config, token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(reason = %e, "Rejected session token");
            None
        }
    }
}
