//! Submission, status, and results boundaries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use startify_core::{
    Competitor, GeneratedContent, InvestorMatch, Job, JobStatus, JobStore, MarketInsights,
    OutputKind, PitchSections, ResearchResult, StructuredIdea,
};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::worker::JobQueue;

const MAX_REQUESTER_CHARS: usize = 320;
const MAX_IDEA_CHARS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusView {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaView {
    pub raw: String,
    pub parsed: StructuredIdea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResults {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub idea: IdeaView,
    pub brand_names: Vec<String>,
    pub slogans: Vec<String>,
    pub logo_prompts: Vec<String>,
    pub ad_copies: Vec<String>,
    pub pitch_sections: PitchSections,
    pub market_insights: MarketInsights,
    pub competitors: Vec<Competitor>,
    pub investors: Vec<InvestorMatch>,
    /// Path of the primary artifact written by the assembler.
    pub artifact_path: Option<String>,
}

#[derive(Clone)]
pub struct IdeaService {
    jobs: Arc<dyn JobStore>,
    queue: JobQueue,
}

impl IdeaService {
    #[must_use]
    pub fn new(jobs: Arc<dyn JobStore>, queue: JobQueue) -> Self {
        Self { jobs, queue }
    }

    /// Validate, create a `pending` job, and enqueue it. Returns without
    /// waiting for the job to run.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidInput`] for a blank or oversized requester or
    /// idea; store and queue failures otherwise.
    pub async fn submit(&self, requester: &str, idea_text: &str) -> Result<Uuid, ServiceError> {
        let requester = requester.trim();
        if requester.is_empty() {
            return Err(ServiceError::InvalidInput("requester is required".to_string()));
        }
        if requester.chars().count() > MAX_REQUESTER_CHARS {
            return Err(ServiceError::InvalidInput(format!(
                "requester exceeds {MAX_REQUESTER_CHARS} characters"
            )));
        }
        let idea_text = idea_text.trim();
        if idea_text.is_empty() {
            return Err(ServiceError::InvalidInput("idea text is required".to_string()));
        }
        if idea_text.chars().count() > MAX_IDEA_CHARS {
            return Err(ServiceError::InvalidInput(format!(
                "idea text exceeds {MAX_IDEA_CHARS} characters"
            )));
        }

        let job = self.jobs.create_job(requester, idea_text).await?;
        tracing::info!(job_id = %job.id, requester, "job submitted");
        if let Err(source) = self.queue.enqueue(job.id).await {
            self.abandon(job.id, &source.to_string()).await;
            return Err(ServiceError::NotQueued {
                job_id: job.id,
                source,
            });
        }
        Ok(job.id)
    }

    /// Move a job that will never be picked up out of `pending`.
    async fn abandon(&self, id: Uuid, reason: &str) {
        if let Err(e) = self.jobs.record_error(id, reason).await {
            tracing::error!(job_id = %id, error = %e, "failed to record enqueue error");
        }
        let moved = async {
            self.jobs
                .transition_status(id, JobStatus::Pending, JobStatus::Processing)
                .await?;
            self.jobs
                .transition_status(id, JobStatus::Processing, JobStatus::Failed)
                .await
        }
        .await;
        match moved {
            Ok(()) => tracing::warn!(job_id = %id, reason, "job not queued; marked failed"),
            Err(e) => {
                tracing::error!(job_id = %id, error = %e, "failed to mark unqueued job failed");
            }
        }
    }

    /// # Errors
    ///
    /// [`ServiceError::InvalidInput`] for a malformed id,
    /// [`ServiceError::NotFound`] for an unknown one.
    pub async fn status(&self, job_id: &str) -> Result<JobStatusView, ServiceError> {
        let job = self.load(job_id).await?;
        Ok(JobStatusView {
            job_id: job.id,
            status: job.status,
            progress: job.status.progress_percent(),
        })
    }

    /// # Errors
    ///
    /// As [`IdeaService::status`], plus [`ServiceError::NotCompleted`] when
    /// the job has not completed and [`ServiceError::MissingOutput`] when a
    /// completed job lacks its stored outputs.
    pub async fn results(&self, job_id: &str) -> Result<JobResults, ServiceError> {
        let job = self.load(job_id).await?;
        if job.status != JobStatus::Completed {
            return Err(ServiceError::NotCompleted { status: job.status });
        }

        let outputs = self.jobs.list_outputs(job.id).await?;
        let latest = |kind: OutputKind| outputs.iter().rev().find(|o| o.kind == kind);

        let research_record = latest(OutputKind::Research).ok_or(ServiceError::MissingOutput {
            job_id: job.id,
            kind: OutputKind::Research.as_str(),
        })?;
        let content_record = latest(OutputKind::Content).ok_or(ServiceError::MissingOutput {
            job_id: job.id,
            kind: OutputKind::Content.as_str(),
        })?;

        let research: ResearchResult = serde_json::from_value(research_record.content.clone())?;
        let content: GeneratedContent = serde_json::from_value(content_record.content.clone())?;
        let parsed = job
            .structured_idea
            .clone()
            .unwrap_or_else(|| StructuredIdea::fallback(job.idea_text.clone()));

        Ok(JobResults {
            job_id: job.id,
            status: job.status,
            idea: IdeaView {
                raw: job.idea_text,
                parsed,
            },
            brand_names: content.brand_names,
            slogans: content.slogans,
            logo_prompts: content.logo_prompts,
            ad_copies: content.ad_copies,
            pitch_sections: content.pitch_sections,
            market_insights: research.market_insights,
            competitors: research.competitors,
            investors: research.investors,
            artifact_path: content_record.file_path.clone(),
        })
    }

    async fn load(&self, job_id: &str) -> Result<Job, ServiceError> {
        let id = Uuid::parse_str(job_id.trim())
            .map_err(|e| ServiceError::InvalidInput(format!("malformed job id {job_id:?}: {e}")))?;
        self.jobs
            .get_job(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
