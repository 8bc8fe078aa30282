//! Account persistence
//!
//! Usernames and emails are lower-cased before every write and lookup, which
//! makes the unique constraints on both columns case-insensitive.

use super::{StoreError, StoreResult};
use crate::auth::password::{hash_password, verify_password};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use validator::Validate;

/// Account row, including the password hash
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountOut {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<Account> for AccountOut {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}

/// Signup request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Password change request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Account about to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    fn normalized(&self) -> StoreResult<(String, String)> {
        let username = self.username.trim().to_lowercase();
        let email = self.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(StoreError::Validation("username must not be empty".into()));
        }
        if !email.contains('@') {
            return Err(StoreError::Validation("email is not valid".into()));
        }
        if self.password_hash.is_empty() {
            return Err(StoreError::Validation("password hash must not be empty".into()));
        }

        Ok((username, email))
    }
}

#[derive(Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account
    ///
    /// A duplicate username or email surfaces as `StoreError::Database`.
    pub async fn create(&self, account: &NewAccount) -> StoreResult<Account> {
        let (username, email) = account.normalized()?;

        let row = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email, password) VALUES ($1, $2, $3) \
             RETURNING id, username, email, password",
        )
        .bind(&username)
        .bind(&email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(account_id = row.id, "Account created");
        Ok(row)
    }

    pub async fn get_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password FROM accounts WHERE username = $1",
        )
        .bind(username.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password FROM accounts WHERE email = $1",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Replace the password after checking the current one
    ///
    /// Read then write without a lock: concurrent updates are last-write-wins.
    pub async fn update_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> StoreResult<Account> {
        let account = self
            .get_by_username(username)
            .await?
            .ok_or_else(|| StoreError::NotFound("User".into()))?;

        if !verify_password(old_password, &account.password) {
            return Err(StoreError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password)?;

        let row = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET password = $1 WHERE id = $2 \
             RETURNING id, username, email, password",
        )
        .bind(&new_hash)
        .bind(account.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
