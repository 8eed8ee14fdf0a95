//! Database operations for `job_outputs`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use startify_core::{OutputKind, OutputRecord};
use uuid::Uuid;

use crate::DbError;

/// A row from the `job_outputs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutputRow {
    pub id: i64,
    pub job_id: Uuid,
    pub output_type: String,
    pub content: serde_json::Value,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OutputRow> for OutputRecord {
    type Error = DbError;

    fn try_from(row: OutputRow) -> Result<Self, Self::Error> {
        let kind = row
            .output_type
            .parse::<OutputKind>()
            .map_err(|_| DbError::InvalidColumn {
                column: "job_outputs.output_type",
                value: row.output_type.clone(),
            })?;
        Ok(OutputRecord {
            job_id: row.job_id,
            kind,
            content: row.content,
            file_path: row.file_path,
            created_at: row.created_at,
        })
    }
}

/// Appends one output for a job.
///
/// # Errors
///
/// Returns [`DbError::JobNotFound`] when the job does not exist, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_output(
    pool: &PgPool,
    job_id: Uuid,
    kind: OutputKind,
    content: &serde_json::Value,
    file_path: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "INSERT INTO job_outputs (job_id, output_type, content, file_path) \
         SELECT id, $2, $3, $4 FROM jobs WHERE id = $1",
    )
    .bind(job_id)
    .bind(kind.as_str())
    .bind(content)
    .bind(file_path)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::JobNotFound(job_id));
    }
    Ok(())
}

/// Outputs for a job in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidColumn`] for an unknown `output_type`.
pub async fn list_outputs(pool: &PgPool, job_id: Uuid) -> Result<Vec<OutputRecord>, DbError> {
    let rows = sqlx::query_as::<_, OutputRow>(
        "SELECT id, job_id, output_type, content, file_path, created_at \
         FROM job_outputs \
         WHERE job_id = $1 \
         ORDER BY id ASC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(OutputRecord::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_type_must_be_known() {
        let row = OutputRow {
            id: 1,
            job_id: Uuid::new_v4(),
            output_type: "slides".to_string(),
            content: serde_json::json!({}),
            file_path: None,
            created_at: Utc::now(),
        };
        let err = OutputRecord::try_from(row).unwrap_err();
        assert!(matches!(err, DbError::InvalidColumn { .. }));
    }
}
