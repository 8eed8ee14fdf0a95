use startify_core::{ConfigError, JobStatus, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("text generation failed: {0}")]
    Llm(String),

    #[error("annotation service failed: {0}")]
    Annotator(String),

    #[error("job {0} disappeared from the store")]
    JobMissing(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the submission, status, and results boundaries.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("job is not completed yet (current status: {status})")]
    NotCompleted { status: JobStatus },

    #[error("job {job_id} is completed but its {kind} output is missing")]
    MissingOutput { job_id: Uuid, kind: &'static str },

    /// The job row was created but could not be queued; it has been moved
    /// to `failed`.
    #[error("job {job_id} was not queued: {source}")]
    NotQueued {
        job_id: Uuid,
        #[source]
        source: crate::worker::QueueClosed,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
