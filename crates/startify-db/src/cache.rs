//! Database operations for `research_cache`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;

use crate::DbError;

/// Returns the cached value for `key` unless it has expired at `now`.
/// An expired row is deleted before absence is reported.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn get_cached(
    pool: &PgPool,
    key: &str,
    now: DateTime<Utc>,
) -> Result<Option<serde_json::Value>, DbError> {
    sqlx::query(
        "DELETE FROM research_cache \
         WHERE key = $1 AND expires_at IS NOT NULL AND expires_at <= $2",
    )
    .bind(key)
    .bind(now)
    .execute(pool)
    .await?;

    let data = sqlx::query_scalar::<_, serde_json::Value>(
        "SELECT data FROM research_cache WHERE key = $1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(data)
}

/// Upserts `value` under `key`, restarting its expiry window from `now`.
/// A TTL too large to represent never expires.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn put_cached(
    pool: &PgPool,
    key: &str,
    value: &serde_json::Value,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO research_cache (key, data, cached_at, expires_at) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (key) DO UPDATE \
         SET data = EXCLUDED.data, cached_at = EXCLUDED.cached_at, expires_at = EXCLUDED.expires_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .bind(expiry(now, ttl))
    .execute(pool)
    .await?;

    Ok(())
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
}
