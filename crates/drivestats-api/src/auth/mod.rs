//! Authentication and authorization
//!
//! - Password hashing with Argon2
//! - Session token issuance and validation
//! - Cookie / bearer session resolution and the auth middleware
//! - Sign-out revocation list
//! - Ownership checks for user-scoped resources

pub mod jwt;
pub mod ownership;
pub mod password;
pub mod revocation;
pub mod session;

pub use jwt::{decode_token, issue_token, Claims, JwtConfig, JwtError, TokenUser};
pub use ownership::{ensure_owner, require_vehicle_owner, Owned};
pub use password::{hash_password, verify_password, PasswordError};
pub use revocation::RevocationList;
pub use session::{
    require_auth, resolve_session, session_middleware, SessionToken, SessionUser, SESSION_COOKIE,
};
