//! Persistence contracts consumed by the pipeline.
//!
//! `startify-db` implements both traits on Postgres; [`crate::MemoryStore`]
//! implements them in-process for tests and single-shot CLI runs.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::idea::StructuredIdea;
use crate::job::{Job, JobStatus, OutputKind, OutputRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    /// The job was not in `from`, or `from → to` is not a legal transition.
    #[error("job {id}: cannot transition {from} -> {to}")]
    InvalidTransition {
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job in `pending`.
    async fn create_job(&self, requester: &str, idea_text: &str) -> Result<Job, StoreError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Compare-and-set status change. Fails with
    /// [`StoreError::InvalidTransition`] when the job is not currently in
    /// `from` or when the state machine forbids `from → to`.
    async fn transition_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<(), StoreError>;

    async fn save_structured_idea(
        &self,
        id: Uuid,
        idea: &StructuredIdea,
    ) -> Result<(), StoreError>;

    async fn record_error(&self, id: Uuid, message: &str) -> Result<(), StoreError>;

    async fn save_output(
        &self,
        job_id: Uuid,
        kind: OutputKind,
        content: serde_json::Value,
        file_path: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn list_outputs(&self, job_id: Uuid) -> Result<Vec<OutputRecord>, StoreError>;
}

/// Key/value store with per-entry expiry.
///
/// `get` never returns an expired entry; `put` overwrites and restarts the
/// expiry window. Concurrent writers to the same key are last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    async fn put(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), StoreError>;
}
