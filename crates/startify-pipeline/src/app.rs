//! Wires configuration and stores into a running pipeline.

use std::sync::Arc;
use std::time::Duration;

use startify_core::{
    builtin_investor_pool, load_investor_pool, AppConfig, CacheStore, InvestorsFile, JobStore,
};

use crate::assembler::PackageAssembler;
use crate::error::PipelineError;
use crate::generator::ContentGenerator;
use crate::llm::{OpenRouterClient, TextGenerator};
use crate::orchestrator::Orchestrator;
use crate::research::{HttpTrendProvider, ReferenceFetcher, ResearchStage};
use crate::service::IdeaService;
use crate::structurer::select_structurer;
use crate::worker::WorkerPool;

/// Build the orchestrator described by `config`.
///
/// Probes the annotation service once, enables the model strategy only when
/// configured with a key, and loads the investor pool from
/// `investors_path` or the built-in list.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] for an unreadable or invalid investor
/// file and [`PipelineError::Http`] when an HTTP client cannot be built.
pub async fn build_orchestrator(
    config: &AppConfig,
    jobs: Arc<dyn JobStore>,
    cache: Arc<dyn CacheStore>,
) -> Result<Orchestrator, PipelineError> {
    let structurer = select_structurer(config).await;

    let model: Option<Arc<dyn TextGenerator>> = match OpenRouterClient::from_config(config)? {
        Some(client) => {
            tracing::info!(model = %config.openrouter_model, "text generation enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("text generation disabled; using templates");
            None
        }
    };

    let InvestorsFile { investors } = match &config.investors_path {
        Some(path) => load_investor_pool(path)?,
        None => builtin_investor_pool()?,
    };
    tracing::info!(investors = investors.len(), "investor pool loaded");

    let fetcher = ReferenceFetcher::new(
        config.research_sources.clone(),
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let mut research = ResearchStage::new(cache, fetcher, investors)
        .with_ttl(Duration::from_secs(config.cache_ttl_secs));
    if let Some(url) = config.trends_url.as_deref() {
        research = research
            .with_trend_provider(Arc::new(HttpTrendProvider::new(url, config.http_timeout_secs)?));
    }
    if let Some(model) = &model {
        research = research.with_summarizer(Arc::clone(model));
    }

    Ok(Orchestrator::new(
        jobs,
        structurer,
        research,
        ContentGenerator::from_model(model),
        Arc::new(PackageAssembler::new(&config.output_dir)),
    ))
}

/// A started pipeline: worker pool plus the boundaries that feed it.
pub struct App {
    pool: WorkerPool,
    service: IdeaService,
}

impl App {
    /// # Errors
    ///
    /// See [`build_orchestrator`].
    pub async fn start(
        config: &AppConfig,
        jobs: Arc<dyn JobStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self, PipelineError> {
        let orchestrator = build_orchestrator(config, Arc::clone(&jobs), cache).await?;
        let pool = WorkerPool::start(
            Arc::new(orchestrator),
            config.worker_count,
            config.queue_capacity,
        );
        let service = IdeaService::new(jobs, pool.queue());
        Ok(Self { pool, service })
    }

    #[must_use]
    pub fn service(&self) -> &IdeaService {
        &self.service
    }

    /// Drain queued and in-flight jobs, then stop.
    pub async fn shutdown(self) {
        self.pool.shutdown().await;
    }
}
