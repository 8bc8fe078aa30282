//! Bug report persistence

use super::StoreResult;
use chrono::{DateTime, NaiveDate, Utc};
use drivestats_core::to_local_date;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use validator::Validate;

const COLUMNS: &str = "id, bug_title, bug_desc, bug_behavior, bug_rating, created_date, user_id";

#[derive(Debug, Clone, FromRow)]
struct BugReportRow {
    id: i32,
    bug_title: String,
    bug_desc: String,
    bug_behavior: String,
    bug_rating: String,
    created_date: DateTime<Utc>,
    user_id: i32,
}

/// Bug report record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BugReport {
    pub id: i32,
    pub bug_title: String,
    pub bug_desc: String,
    pub bug_behavior: String,
    /// Reporter-assigned severity
    pub bug_rating: String,
    pub created_date: NaiveDate,
    pub user_id: i32,
}

impl From<BugReportRow> for BugReport {
    fn from(row: BugReportRow) -> Self {
        Self {
            id: row.id,
            bug_title: row.bug_title,
            bug_desc: row.bug_desc,
            bug_behavior: row.bug_behavior,
            bug_rating: row.bug_rating,
            created_date: to_local_date(row.created_date),
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BugReportIn {
    #[validate(length(min = 1, max = 200))]
    pub bug_title: String,
    #[validate(length(min = 1, max = 5000))]
    pub bug_desc: String,
    #[validate(length(max = 5000))]
    pub bug_behavior: String,
    #[validate(length(min = 1, max = 50))]
    pub bug_rating: String,
}

#[derive(Clone)]
pub struct BugReportStore {
    pool: PgPool,
}

impl BugReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i32, report: &BugReportIn) -> StoreResult<BugReport> {
        let row = sqlx::query_as::<_, BugReportRow>(&format!(
            "INSERT INTO bug_report (bug_title, bug_desc, bug_behavior, bug_rating, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&report.bug_title)
        .bind(&report.bug_desc)
        .bind(&report.bug_behavior)
        .bind(&report.bug_rating)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<BugReport>> {
        let row = sqlx::query_as::<_, BugReportRow>(&format!(
            "SELECT {COLUMNS} FROM bug_report WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Reports filed by `user_id`, newest first
    pub async fn list_by_user(&self, user_id: i32) -> StoreResult<Vec<BugReport>> {
        let rows = sqlx::query_as::<_, BugReportRow>(&format!(
            "SELECT {COLUMNS} FROM bug_report WHERE user_id = $1 \
             ORDER BY created_date DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: i32, report: &BugReportIn) -> StoreResult<Option<BugReport>> {
        let row = sqlx::query_as::<_, BugReportRow>(&format!(
            "UPDATE bug_report SET bug_title = $1, bug_desc = $2, bug_behavior = $3, \
             bug_rating = $4 WHERE id = $5 RETURNING {COLUMNS}"
        ))
        .bind(&report.bug_title)
        .bind(&report.bug_desc)
        .bind(&report.bug_behavior)
        .bind(&report.bug_rating)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn delete(&self, id: i32) -> StoreResult<Option<BugReport>> {
        let row = sqlx::query_as::<_, BugReportRow>(&format!(
            "DELETE FROM bug_report WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
