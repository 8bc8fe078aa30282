/// Password hashing and verification using Argon2id
///
/// Hashes are PHC strings that carry the algorithm, parameters and a random
/// 16-byte salt, so the same plaintext never hashes to the same string twice.
/// Cost parameters are the library defaults.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Hash a plaintext password using Argon2id
///
/// # Example
///
/// ```no_run
/// use drivestats_api::auth::password::hash_password;
///
/// let hash = hash_password("hunter22").expect("Failed to hash password");
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// Returns `false` for a wrong password and also for a stored hash that
/// cannot be parsed; the latter is logged since it points at bad data.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Password verification failed");
            false
        }
    }
}
