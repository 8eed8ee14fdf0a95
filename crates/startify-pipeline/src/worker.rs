//! Bounded pool that runs queued jobs off the submitting task.
//!
//! Job ids flow through a bounded channel to a dispatcher, which spawns one
//! task per job while holding a semaphore permit, so at most `workers` jobs
//! run at once.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::orchestrator::Orchestrator;

#[derive(Debug, Error)]
#[error("job queue is closed")]
pub struct QueueClosed;

/// Cloneable handle for enqueueing job ids. Does not keep the pool alive.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::WeakSender<Uuid>,
}

impl JobQueue {
    /// Waits for a free slot when the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] once the pool has shut down.
    pub async fn enqueue(&self, job_id: Uuid) -> Result<(), QueueClosed> {
        let sender = self.sender.upgrade().ok_or(QueueClosed)?;
        sender.send(job_id).await.map_err(|_| QueueClosed)
    }
}

pub struct WorkerPool {
    sender: mpsc::Sender<Uuid>,
    dispatcher: JoinHandle<()>,
}

impl WorkerPool {
    /// Spawn the dispatcher. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(orchestrator: Arc<Orchestrator>, workers: usize, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let workers = u32::try_from(workers.max(1)).unwrap_or(u32::MAX);
        tracing::info!(workers, capacity, "worker pool started");
        let dispatcher = tokio::spawn(dispatch(orchestrator, receiver, workers));
        Self { sender, dispatcher }
    }

    #[must_use]
    pub fn queue(&self) -> JobQueue {
        JobQueue {
            sender: self.sender.downgrade(),
        }
    }

    /// Stop accepting jobs, then wait for queued and in-flight jobs to finish.
    pub async fn shutdown(self) {
        let Self { sender, dispatcher } = self;
        drop(sender);
        if let Err(e) = dispatcher.await {
            tracing::error!(error = %e, "worker pool dispatcher aborted");
        }
    }
}

async fn dispatch(orchestrator: Arc<Orchestrator>, mut receiver: mpsc::Receiver<Uuid>, workers: u32) {
    let slots = Arc::new(Semaphore::new(workers as usize));

    while let Some(job_id) = receiver.recv().await {
        let Ok(permit) = Arc::clone(&slots).acquire_owned().await else {
            break;
        };
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            run_job(orchestrator, job_id).await;
            drop(permit);
        });
    }

    // All permits back means every spawned job has finished.
    if slots.acquire_many(workers).await.is_err() {
        tracing::warn!("worker slots closed before drain");
    }
    tracing::info!("worker pool drained");
}

/// Run one job in its own task so a panic inside a stage still ends with
/// the job marked failed.
async fn run_job(orchestrator: Arc<Orchestrator>, job_id: Uuid) {
    let worker = Arc::clone(&orchestrator);
    match tokio::spawn(async move { worker.process(job_id).await }).await {
        Ok(outcome) => {
            tracing::debug!(job_id = %job_id, outcome = ?outcome, "job finished");
        }
        Err(e) => {
            orchestrator
                .mark_failed(job_id, &format!("worker task aborted: {e}"))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use startify_core::{JobStatus, JobStore, MemoryStore, StructuredIdea};

    use super::*;
    use crate::assembler::PackageAssembler;
    use crate::generator::ContentGenerator;
    use crate::structurer::{IdeaStructurer, PatternStructurer};
    use crate::test_support::offline_research;

    fn orchestrator(
        store: &Arc<MemoryStore>,
        structurer: Arc<dyn IdeaStructurer>,
        root: &std::path::Path,
    ) -> Arc<Orchestrator> {
        Arc::new(Orchestrator::new(
            store.clone(),
            structurer,
            offline_research(store.clone()),
            ContentGenerator::from_model(None),
            Arc::new(PackageAssembler::new(root)),
        ))
    }

    #[tokio::test]
    async fn shutdown_drains_every_queued_job() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let pool = WorkerPool::start(orchestrator(&store, Arc::new(PatternStructurer), tmp.path()), 2, 4);
        let queue = pool.queue();

        let mut ids = Vec::new();
        for n in 0..6 {
            let job = store
                .create_job("a@b.c", &format!("delivery app for shop {n}"))
                .await
                .unwrap();
            queue.enqueue(job.id).await.unwrap();
            ids.push(job.id);
        }
        pool.shutdown().await;

        for id in ids {
            let job = store.get_job(id).await.unwrap().unwrap();
            assert_eq!(job.status, JobStatus::Completed, "{id}");
        }
    }

    #[tokio::test]
    async fn duplicate_enqueue_processes_once() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let pool = WorkerPool::start(orchestrator(&store, Arc::new(PatternStructurer), tmp.path()), 4, 8);
        let queue = pool.queue();

        let job = store.create_job("a@b.c", "tutoring app for students").await.unwrap();
        queue.enqueue(job.id).await.unwrap();
        queue.enqueue(job.id).await.unwrap();
        pool.shutdown().await;

        assert_eq!(store.list_outputs(job.id).await.unwrap().len(), 2);
        assert_eq!(
            store.get_job(job.id).await.unwrap().unwrap().status,
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn enqueue_after_shutdown_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let pool = WorkerPool::start(orchestrator(&store, Arc::new(PatternStructurer), tmp.path()), 1, 1);
        let queue = pool.queue();
        pool.shutdown().await;

        assert!(queue.enqueue(Uuid::new_v4()).await.is_err());
    }

    struct PanickingStructurer;

    #[async_trait]
    impl IdeaStructurer for PanickingStructurer {
        async fn structure(&self, _: &str) -> StructuredIdea {
            panic!("structurer exploded");
        }

        fn strategy(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn panicking_stage_marks_job_failed_and_pool_keeps_running() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let pool = WorkerPool::start(orchestrator(&store, Arc::new(PanickingStructurer), tmp.path()), 1, 4);
        let queue = pool.queue();

        let first = store.create_job("a@b.c", "one").await.unwrap();
        let second = store.create_job("a@b.c", "two").await.unwrap();
        queue.enqueue(first.id).await.unwrap();
        queue.enqueue(second.id).await.unwrap();
        pool.shutdown().await;

        for id in [first.id, second.id] {
            let job = store.get_job(id).await.unwrap().unwrap();
            assert_eq!(job.status, JobStatus::Failed);
            assert!(job.error_message.unwrap().starts_with("worker task aborted"));
        }
    }
}
