//! Newsletter subscriber persistence
//!
//! Addresses are lower-cased before storage. Subscribing twice is not an
//! error at this layer: the insert is skipped and `create` returns `None`.

use super::StoreResult;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Subscriber {
    pub id: i32,
    pub subscriber_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubscriberIn {
    #[validate(email)]
    pub subscriber_email: String,
}

#[derive(Clone)]
pub struct NewsletterStore {
    pool: PgPool,
}

impl NewsletterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe an address; `None` when it is already subscribed
    pub async fn create(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        let row = sqlx::query_as::<_, Subscriber>(
            "INSERT INTO newsletter_subscribers (subscriber_email) VALUES ($1) \
             ON CONFLICT (subscriber_email) DO NOTHING \
             RETURNING id, subscriber_email",
        )
        .bind(normalize(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<Subscriber>> {
        let row = sqlx::query_as::<_, Subscriber>(
            "SELECT id, subscriber_email FROM newsletter_subscribers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        let row = sqlx::query_as::<_, Subscriber>(
            "SELECT id, subscriber_email FROM newsletter_subscribers WHERE subscriber_email = $1",
        )
        .bind(normalize(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(&self) -> StoreResult<Vec<Subscriber>> {
        let rows = sqlx::query_as::<_, Subscriber>(
            "SELECT id, subscriber_email FROM newsletter_subscribers ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete_by_email(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        let row = sqlx::query_as::<_, Subscriber>(
            "DELETE FROM newsletter_subscribers WHERE subscriber_email = $1 \
             RETURNING id, subscriber_email",
        )
        .bind(normalize(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
