//! Drives one job through structure → research → generate → assemble and
//! owns its status transitions.

use std::sync::Arc;

use startify_core::{JobStatus, JobStore, OutputKind, StoreError};
use uuid::Uuid;

use crate::assembler::Assembler;
use crate::error::PipelineError;
use crate::generator::ContentGenerator;
use crate::research::ResearchStage;
use crate::structurer::IdeaStructurer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Completed,
    Failed,
    /// The job could not be claimed: unknown, already claimed, or terminal.
    Skipped,
}

pub struct Orchestrator {
    jobs: Arc<dyn JobStore>,
    structurer: Arc<dyn IdeaStructurer>,
    research: ResearchStage,
    generator: ContentGenerator,
    assembler: Arc<dyn Assembler>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        jobs: Arc<dyn JobStore>,
        structurer: Arc<dyn IdeaStructurer>,
        research: ResearchStage,
        generator: ContentGenerator,
        assembler: Arc<dyn Assembler>,
    ) -> Self {
        Self {
            jobs,
            structurer,
            research,
            generator,
            assembler,
        }
    }

    #[must_use]
    pub fn jobs(&self) -> &Arc<dyn JobStore> {
        &self.jobs
    }

    /// Claim `job_id` (`pending → processing`) and run every stage.
    ///
    /// The claim is a compare-and-set, so a job handed to two workers runs
    /// once. Any stage error marks the job `failed`; outputs already saved
    /// stay in place.
    pub async fn process(&self, job_id: Uuid) -> ProcessOutcome {
        match self
            .jobs
            .transition_status(job_id, JobStatus::Pending, JobStatus::Processing)
            .await
        {
            Ok(()) => {}
            Err(StoreError::InvalidTransition { from, .. }) => {
                tracing::debug!(job_id = %job_id, expected = %from, "job not pending; skipping");
                return ProcessOutcome::Skipped;
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "could not claim job");
                return ProcessOutcome::Skipped;
            }
        }

        tracing::info!(job_id = %job_id, "job processing");
        let result = match self.run(job_id).await {
            Ok(()) => self
                .jobs
                .transition_status(job_id, JobStatus::Processing, JobStatus::Completed)
                .await
                .map_err(PipelineError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(job_id = %job_id, "job completed");
                ProcessOutcome::Completed
            }
            Err(e) => {
                self.mark_failed(job_id, &e.to_string()).await;
                ProcessOutcome::Failed
            }
        }
    }

    async fn run(&self, job_id: Uuid) -> Result<(), PipelineError> {
        let job = self
            .jobs
            .get_job(job_id)
            .await?
            .ok_or(PipelineError::JobMissing(job_id))?;

        let idea = self.structurer.structure(&job.idea_text).await;
        tracing::info!(
            job_id = %job_id,
            stage = "structure",
            strategy = self.structurer.strategy(),
            industry = %idea.industry,
            "idea structured"
        );
        self.jobs.save_structured_idea(job_id, &idea).await?;

        let research = self.research.research(&idea).await;
        tracing::info!(
            job_id = %job_id,
            stage = "research",
            competitors = research.competitors.len(),
            investors = research.investors.len(),
            "research ready"
        );
        self.jobs
            .save_output(job_id, OutputKind::Research, serde_json::to_value(&research)?, None)
            .await?;

        let content = self.generator.generate(&idea, &research).await;
        tracing::info!(
            job_id = %job_id,
            stage = "generate",
            strategy = self.generator.strategy(),
            "content generated"
        );

        let artifact = self
            .assembler
            .assemble(job_id, &idea, &research, &content)
            .await?;
        self.jobs
            .save_output(
                job_id,
                OutputKind::Content,
                serde_json::to_value(&content)?,
                Some(&artifact),
            )
            .await?;
        Ok(())
    }

    /// Record `message` and move the job to `failed`. Store errors here are
    /// logged only.
    pub(crate) async fn mark_failed(&self, job_id: Uuid, message: &str) {
        tracing::error!(job_id = %job_id, error = message, "job failed");
        if let Err(e) = self.jobs.record_error(job_id, message).await {
            tracing::error!(job_id = %job_id, error = %e, "could not record job error");
        }
        if let Err(e) = self
            .jobs
            .transition_status(job_id, JobStatus::Processing, JobStatus::Failed)
            .await
        {
            tracing::error!(job_id = %job_id, error = %e, "could not mark job failed");
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
