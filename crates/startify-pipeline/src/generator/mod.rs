//! Structured idea + research → [`GeneratedContent`].
//!
//! Brand names, slogans, and ad copy come from a [`CopyWriter`]: either the
//! model-backed writer or the deterministic templates. Logo prompts and pitch
//! sections are always templated.

pub mod fallback;
mod model;
mod pitch;
pub mod scoring;

use std::sync::Arc;

use async_trait::async_trait;
use startify_core::{GeneratedContent, ResearchResult, StructuredIdea};

use crate::llm::TextGenerator;

pub use model::ModelCopyWriter;
pub use pitch::pitch_sections;

/// Source of the short marketing copy.
#[async_trait]
pub trait CopyWriter: Send + Sync {
    /// Exactly ten names, ranked best first.
    async fn brand_names(&self, idea: &StructuredIdea) -> Vec<String>;

    /// Exactly five slogans, ranked best first.
    async fn slogans(&self, idea: &StructuredIdea) -> Vec<String>;

    /// Between one and five ads.
    async fn ad_copies(&self, idea: &StructuredIdea) -> Vec<String>;

    fn strategy(&self) -> &'static str;
}

pub struct TemplateCopyWriter;

#[async_trait]
impl CopyWriter for TemplateCopyWriter {
    async fn brand_names(&self, idea: &StructuredIdea) -> Vec<String> {
        fallback::brand_names(idea)
    }

    async fn slogans(&self, idea: &StructuredIdea) -> Vec<String> {
        fallback::slogans(idea)
    }

    async fn ad_copies(&self, idea: &StructuredIdea) -> Vec<String> {
        fallback::ad_copies(idea)
    }

    fn strategy(&self) -> &'static str {
        "template"
    }
}

pub struct ContentGenerator {
    writer: Arc<dyn CopyWriter>,
}

impl ContentGenerator {
    #[must_use]
    pub fn new(writer: Arc<dyn CopyWriter>) -> Self {
        Self { writer }
    }

    /// Model-backed copy when a model is configured, templates otherwise.
    #[must_use]
    pub fn from_model(model: Option<Arc<dyn TextGenerator>>) -> Self {
        match model {
            Some(model) => Self::new(Arc::new(ModelCopyWriter::new(model))),
            None => Self::new(Arc::new(TemplateCopyWriter)),
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &'static str {
        self.writer.strategy()
    }

    pub async fn generate(
        &self,
        idea: &StructuredIdea,
        research: &ResearchResult,
    ) -> GeneratedContent {
        let brand_names = self.writer.brand_names(idea).await;
        let slogans = self.writer.slogans(idea).await;
        let ad_copies = self.writer.ad_copies(idea).await;

        tracing::debug!(
            stage = "generate",
            strategy = self.writer.strategy(),
            names = brand_names.len(),
            slogans = slogans.len(),
            ads = ad_copies.len(),
            "copy generated"
        );

        GeneratedContent {
            brand_names,
            slogans,
            logo_prompts: fallback::logo_prompts(idea),
            ad_copies,
            pitch_sections: pitch_sections(idea, research),
        }
    }
}
