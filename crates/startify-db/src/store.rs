//! Postgres-backed [`JobStore`] and [`CacheStore`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use startify_core::{
    CacheStore, Job, JobStatus, JobStore, OutputKind, OutputRecord, StoreError, StructuredIdea,
};
use uuid::Uuid;

use crate::{cache, jobs, outputs};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn create_job(&self, requester: &str, idea_text: &str) -> Result<Job, StoreError> {
        let row = jobs::create_job(&self.pool, requester, idea_text).await?;
        Ok(Job::try_from(row)?)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = jobs::get_job(&self.pool, id).await?;
        Ok(row.map(Job::try_from).transpose()?)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<(), StoreError> {
        Ok(jobs::transition_job_status(&self.pool, id, from, to).await?)
    }

    async fn save_structured_idea(
        &self,
        id: Uuid,
        idea: &StructuredIdea,
    ) -> Result<(), StoreError> {
        Ok(jobs::save_structured_idea(&self.pool, id, idea).await?)
    }

    async fn record_error(&self, id: Uuid, message: &str) -> Result<(), StoreError> {
        Ok(jobs::record_job_error(&self.pool, id, message).await?)
    }

    async fn save_output(
        &self,
        job_id: Uuid,
        kind: OutputKind,
        content: serde_json::Value,
        file_path: Option<&str>,
    ) -> Result<(), StoreError> {
        Ok(outputs::insert_output(&self.pool, job_id, kind, &content, file_path).await?)
    }

    async fn list_outputs(&self, job_id: Uuid) -> Result<Vec<OutputRecord>, StoreError> {
        Ok(outputs::list_outputs(&self.pool, job_id).await?)
    }
}

#[async_trait]
impl CacheStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(cache::get_cached(&self.pool, key, Utc::now()).await?)
    }

    async fn put(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        Ok(cache::put_cached(&self.pool, key, &value, ttl, Utc::now()).await?)
    }
}
