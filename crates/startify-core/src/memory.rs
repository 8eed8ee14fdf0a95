use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::idea::StructuredIdea;
use crate::job::{Job, JobStatus, OutputKind, OutputRecord};
use crate::store::{CacheStore, JobStore, StoreError};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<Uuid, Job>,
    outputs: Vec<OutputRecord>,
    cache: HashMap<String, CacheEntry>,
}

/// In-process implementation of [`JobStore`] and [`CacheStore`].
///
/// Locks are never held across an await point, so a plain mutex is enough.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    clock: Clock,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Use `clock` for every timestamp and expiry check. Tests pass a
    /// controllable clock to simulate elapsed time.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, requester: &str, idea_text: &str) -> Result<Job, StoreError> {
        let now = self.now();
        let job = Job {
            id: Uuid::new_v4(),
            requester: requester.to_string(),
            idea_text: idea_text.to_string(),
            structured_idea: None,
            status: JobStatus::Pending,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.lock()?.jobs.get(&id).cloned())
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut inner = self.lock()?;
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if job.status != from || !from.can_transition_to(to) {
            return Err(StoreError::InvalidTransition { id, from, to });
        }
        job.status = to;
        job.updated_at = now;
        Ok(())
    }

    async fn save_structured_idea(
        &self,
        id: Uuid,
        idea: &StructuredIdea,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut inner = self.lock()?;
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        job.structured_idea = Some(idea.clone());
        job.updated_at = now;
        Ok(())
    }

    async fn record_error(&self, id: Uuid, message: &str) -> Result<(), StoreError> {
        let now = self.now();
        let mut inner = self.lock()?;
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        job.error_message = Some(message.to_string());
        job.updated_at = now;
        Ok(())
    }

    async fn save_output(
        &self,
        job_id: Uuid,
        kind: OutputKind,
        content: serde_json::Value,
        file_path: Option<&str>,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut inner = self.lock()?;
        if !inner.jobs.contains_key(&job_id) {
            return Err(StoreError::NotFound(job_id));
        }
        inner.outputs.push(OutputRecord {
            job_id,
            kind,
            content,
            file_path: file_path.map(str::to_string),
            created_at: now,
        });
        Ok(())
    }

    async fn list_outputs(&self, job_id: Uuid) -> Result<Vec<OutputRecord>, StoreError> {
        Ok(self
            .lock()?
            .outputs
            .iter()
            .filter(|o| o.job_id == job_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let now = self.now();
        let mut inner = self.lock()?;
        let expired = match inner.cache.get(key) {
            None => return Ok(None),
            Some(entry) => entry.expires_at.is_some_and(|at| at <= now),
        };
        if expired {
            inner.cache.remove(key);
            return Ok(None);
        }
        Ok(inner.cache.get(key).map(|entry| entry.value.clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = self.now();
        // A TTL too large for chrono never expires.
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl));
        self.lock()?.cache.insert(
            key.to_string(),
            CacheEntry { value, expires_at },
        );
        Ok(())
    }
}
