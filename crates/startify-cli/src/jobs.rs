use std::sync::Arc;
use std::time::Duration;

use startify_core::{AppConfig, CacheStore, JobStatus, JobStore, MemoryStore};
use startify_db::PgStore;
use startify_pipeline::{select_structurer, App, IdeaService, JobStatusView};

/// Postgres when `DATABASE_URL` is set, otherwise an in-process store that
/// lives only as long as this invocation.
async fn open_stores(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn JobStore>, Arc<dyn CacheStore>)> {
    if config.database_url.is_none() {
        tracing::info!("DATABASE_URL not set; using in-memory store");
        let store = Arc::new(MemoryStore::new());
        let jobs: Arc<dyn JobStore> = store.clone();
        let cache: Arc<dyn CacheStore> = store;
        return Ok((jobs, cache));
    }

    let pool = startify_db::connect_pool_from_config(config).await?;
    startify_db::health_check(&pool).await?;
    let applied = startify_db::run_migrations(&pool).await?;
    tracing::debug!(applied, "migrations checked");

    let store = Arc::new(PgStore::new(pool));
    let jobs: Arc<dyn JobStore> = store.clone();
    let cache: Arc<dyn CacheStore> = store;
    Ok((jobs, cache))
}

/// Lookups by job id only make sense against a store that outlives the
/// process that submitted the job.
pub(crate) fn require_shared_store(config: &AppConfig, command: &str) -> anyhow::Result<()> {
    if config.database_url.is_none() {
        anyhow::bail!(
            "`{command}` needs DATABASE_URL; without it jobs only exist inside a single `run`"
        );
    }
    Ok(())
}

pub(crate) fn format_status(view: &JobStatusView) -> String {
    format!("job {}: {} ({}%)", view.job_id, view.status, view.progress)
}

/// Submit an idea, report progress on stderr until the job is terminal, then
/// print its results as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the input is rejected, the stores cannot be opened, or
/// the job ends in `failed`.
pub(crate) async fn run_idea(
    config: &AppConfig,
    requester: &str,
    idea: &str,
    poll: Duration,
) -> anyhow::Result<()> {
    let (jobs, cache) = open_stores(config).await?;
    let app = App::start(config, Arc::clone(&jobs), cache).await?;
    let service = app.service().clone();

    let job_id = service.submit(requester, idea).await?;
    eprintln!("submitted job {job_id}");

    let finished = wait_for_terminal(&service, &job_id.to_string(), poll).await;
    app.shutdown().await;
    let view = finished?;

    if view.status == JobStatus::Failed {
        let reason = jobs
            .get_job(job_id)
            .await?
            .and_then(|job| job.error_message)
            .unwrap_or_else(|| "no error recorded".to_string());
        anyhow::bail!("job {job_id} failed: {reason}");
    }

    let results = service.results(&job_id.to_string()).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn wait_for_terminal(
    service: &IdeaService,
    job_id: &str,
    poll: Duration,
) -> anyhow::Result<JobStatusView> {
    let mut last = None;
    loop {
        let view = service.status(job_id).await?;
        if last != Some(view.status) {
            eprintln!("{}", format_status(&view));
            last = Some(view.status);
        }
        if view.status.is_terminal() {
            return Ok(view);
        }
        tokio::time::sleep(poll).await;
    }
}

/// # Errors
///
/// Returns an error without `DATABASE_URL`, for a malformed or unknown id, or
/// when the store is unreachable.
pub(crate) async fn run_status(config: &AppConfig, job_id: &str) -> anyhow::Result<()> {
    require_shared_store(config, "status")?;
    let (jobs, cache) = open_stores(config).await?;
    let app = App::start(config, jobs, cache).await?;

    let view = app.service().status(job_id).await;
    app.shutdown().await;
    println!("{}", format_status(&view?));
    Ok(())
}

/// # Errors
///
/// Returns an error without `DATABASE_URL`, for a malformed or unknown id, or
/// when the job has not completed.
pub(crate) async fn run_results(config: &AppConfig, job_id: &str) -> anyhow::Result<()> {
    require_shared_store(config, "results")?;
    let (jobs, cache) = open_stores(config).await?;
    let app = App::start(config, jobs, cache).await?;

    let results = app.service().results(job_id).await;
    app.shutdown().await;
    println!("{}", serde_json::to_string_pretty(&results?)?);
    Ok(())
}

pub(crate) async fn run_structure(config: &AppConfig, idea: &str) -> anyhow::Result<()> {
    let idea = idea.trim();
    if idea.is_empty() {
        anyhow::bail!("idea text is required");
    }
    let structurer = select_structurer(config).await;
    let structured = structurer.structure(idea).await;
    tracing::debug!(strategy = structurer.strategy(), "idea structured");
    println!("{}", serde_json::to_string_pretty(&structured)?);
    Ok(())
}
