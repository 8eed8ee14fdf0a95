use async_trait::async_trait;
use startify_core::{
    GeneratedContent, MemoryStore, OutputKind, ResearchResult, StructuredIdea,
};

use super::*;
use crate::assembler::PackageAssembler;
use crate::structurer::PatternStructurer;
use crate::test_support::offline_research;

struct BrokenAssembler;

#[async_trait]
impl Assembler for BrokenAssembler {
    async fn assemble(
        &self,
        _: Uuid,
        _: &StructuredIdea,
        _: &ResearchResult,
        _: &GeneratedContent,
    ) -> Result<String, PipelineError> {
        Err(PipelineError::Io {
            path: "/readonly/pitch_deck.md".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

fn orchestrator(store: &Arc<MemoryStore>, assembler: Arc<dyn Assembler>) -> Orchestrator {
    Orchestrator::new(
        store.clone(),
        Arc::new(PatternStructurer),
        offline_research(store.clone()),
        ContentGenerator::from_model(None),
        assembler,
    )
}

#[tokio::test]
async fn pending_job_runs_to_completion() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(&store, Arc::new(PackageAssembler::new(tmp.path())));
    let job = store
        .create_job("founder@example.com", "smart grocery app for rural areas with delivery")
        .await
        .unwrap();

    assert_eq!(orchestrator.process(job.id).await, ProcessOutcome::Completed);

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error_message.is_none());
    assert_eq!(job.structured_idea.unwrap().industry, "grocery");

    let outputs = store.list_outputs(job.id).await.unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].kind, OutputKind::Research);
    assert_eq!(outputs[1].kind, OutputKind::Content);
    let artifact = outputs[1].file_path.as_deref().unwrap();
    assert!(artifact.ends_with("pitch_deck.md"));
    assert!(std::path::Path::new(artifact).exists());
}

#[tokio::test]
async fn assembly_failure_marks_failed_and_keeps_partial_results() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(&store, Arc::new(BrokenAssembler));
    let job = store
        .create_job("founder@example.com", "pet care platform for busy owners")
        .await
        .unwrap();

    assert_eq!(orchestrator.process(job.id).await, ProcessOutcome::Failed);

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.unwrap().contains("/readonly/pitch_deck.md"));
    assert!(job.structured_idea.is_some());

    let outputs = store.list_outputs(job.id).await.unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].kind, OutputKind::Research);
}

#[tokio::test]
async fn terminal_and_claimed_jobs_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(&store, Arc::new(PackageAssembler::new(tmp.path())));
    let job = store.create_job("a@b.c", "tutoring app for students").await.unwrap();

    assert_eq!(orchestrator.process(job.id).await, ProcessOutcome::Completed);
    assert_eq!(orchestrator.process(job.id).await, ProcessOutcome::Skipped);
    assert_eq!(store.list_outputs(job.id).await.unwrap().len(), 2);

    let claimed = store.create_job("a@b.c", "tutoring app for students").await.unwrap();
    store
        .transition_status(claimed.id, JobStatus::Pending, JobStatus::Processing)
        .await
        .unwrap();
    assert_eq!(orchestrator.process(claimed.id).await, ProcessOutcome::Skipped);
    let claimed = store.get_job(claimed.id).await.unwrap().unwrap();
    assert_eq!(claimed.status, JobStatus::Processing);
}

#[tokio::test]
async fn unknown_job_is_skipped() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(&store, Arc::new(BrokenAssembler));
    assert_eq!(orchestrator.process(Uuid::new_v4()).await, ProcessOutcome::Skipped);
}

#[tokio::test]
async fn failed_job_never_leaves_failed() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = orchestrator(&store, Arc::new(BrokenAssembler));
    let job = store.create_job("a@b.c", "x").await.unwrap();
    assert_eq!(orchestrator.process(job.id).await, ProcessOutcome::Failed);

    for to in [JobStatus::Pending, JobStatus::Processing, JobStatus::Completed] {
        let err = store
            .transition_status(job.id, JobStatus::Failed, to)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }
    assert_eq!(
        store.get_job(job.id).await.unwrap().unwrap().status,
        JobStatus::Failed
    );
}
