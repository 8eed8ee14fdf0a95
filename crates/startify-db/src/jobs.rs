//! Database operations for `jobs`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use startify_core::{Job, JobStatus, StructuredIdea};
use uuid::Uuid;

use crate::DbError;

/// A row from the `jobs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub requester: String,
    pub idea_text: String,
    pub structured_idea: Option<serde_json::Value>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = DbError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|_| DbError::InvalidColumn {
                column: "jobs.status",
                value: row.status.clone(),
            })?;
        let structured_idea = row
            .structured_idea
            .map(serde_json::from_value::<StructuredIdea>)
            .transpose()?;
        Ok(Job {
            id: row.id,
            requester: row.requester,
            idea_text: row.idea_text,
            structured_idea,
            status,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const JOB_COLUMNS: &str =
    "id, requester, idea_text, structured_idea, status, error_message, created_at, updated_at";

/// Inserts a new job in `pending` status with a UUID generated in Rust.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_job(pool: &PgPool, requester: &str, idea_text: &str) -> Result<JobRow, DbError> {
    let row = sqlx::query_as::<_, JobRow>(&format!(
        "INSERT INTO jobs (id, requester, idea_text, status) \
         VALUES ($1, $2, $3, 'pending') \
         RETURNING {JOB_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(requester)
    .bind(idea_text)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetches a job by id. Returns `None` when absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>, DbError> {
    let row = sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Compare-and-set status change: only applies while the row is in `from`.
///
/// # Errors
///
/// Returns [`DbError::InvalidTransition`] if `from → to` is not a legal
/// transition or the job is no longer in `from`, [`DbError::JobNotFound`]
/// if the job does not exist, or [`DbError::Sqlx`] if a query fails.
pub async fn transition_job_status(
    pool: &PgPool,
    id: Uuid,
    from: JobStatus,
    to: JobStatus,
) -> Result<(), DbError> {
    if !from.can_transition_to(to) {
        return Err(DbError::InvalidTransition { id, from, to });
    }

    let result = sqlx::query(
        "UPDATE jobs \
         SET status = $1, updated_at = NOW() \
         WHERE id = $2 AND status = $3",
    )
    .bind(to.as_str())
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(if job_exists(pool, id).await? {
            DbError::InvalidTransition { id, from, to }
        } else {
            DbError::JobNotFound(id)
        });
    }

    Ok(())
}

/// Stores the structured idea as JSONB.
///
/// # Errors
///
/// Returns [`DbError::JobNotFound`] if no row was updated, or
/// [`DbError::Sqlx`] / [`DbError::Serialization`] on failure.
pub async fn save_structured_idea(
    pool: &PgPool,
    id: Uuid,
    idea: &StructuredIdea,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE jobs SET structured_idea = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(serde_json::to_value(idea)?)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::JobNotFound(id));
    }
    Ok(())
}

/// Sets `error_message` without touching status.
///
/// # Errors
///
/// Returns [`DbError::JobNotFound`] if no row was updated, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn record_job_error(pool: &PgPool, id: Uuid, message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE jobs SET error_message = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::JobNotFound(id));
    }
    Ok(())
}

async fn job_exists(pool: &PgPool, id: Uuid) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, structured_idea: Option<serde_json::Value>) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            requester: "founder@example.com".to_string(),
            idea_text: "grocery app".to_string(),
            structured_idea,
            status: status.to_string(),
            error_message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_into_job() {
        let idea = StructuredIdea::fallback("grocery app");
        let job = Job::try_from(row("processing", Some(serde_json::to_value(&idea).unwrap())))
            .unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.structured_idea, Some(idea));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = Job::try_from(row("archived", None)).unwrap_err();
        assert!(matches!(err, DbError::InvalidColumn { column: "jobs.status", .. }));
    }

    #[test]
    fn malformed_structured_idea_is_rejected() {
        let err = Job::try_from(row("pending", Some(serde_json::json!({"industry": 3}))))
            .unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }
}
