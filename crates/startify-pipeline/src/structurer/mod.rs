//! Raw idea text → [`StructuredIdea`].
//!
//! Two interchangeable strategies satisfy [`IdeaStructurer`]: a linguistic one
//! backed by an annotation service, and a regex-driven pattern one. Which one a
//! process uses is decided once by [`select_structurer`].

mod annotator;
mod linguistic;
mod pattern;

use std::sync::Arc;

use async_trait::async_trait;
use startify_core::{AppConfig, StructuredIdea};

pub use annotator::{AnnotatedDoc, Annotator, AnnotatorClient, EntitySpan, Token};
pub use linguistic::{structure_annotated, LinguisticStructurer};
pub use pattern::{structure_with_patterns, PatternStructurer};

/// Product keywords that mark the word before them as the industry.
pub(crate) const PRODUCT_KEYWORDS: [&str; 6] =
    ["app", "platform", "service", "system", "tool", "software"];

#[async_trait]
pub trait IdeaStructurer: Send + Sync {
    /// Never fails. The worst case is [`StructuredIdea::fallback`].
    async fn structure(&self, raw: &str) -> StructuredIdea;

    /// Short strategy name for logs.
    fn strategy(&self) -> &'static str;
}

/// Probe for the annotation service once and pick a strategy for the
/// lifetime of the process.
pub async fn select_structurer(config: &AppConfig) -> Arc<dyn IdeaStructurer> {
    let Some(url) = config.annotator_url.as_deref() else {
        tracing::info!(strategy = "pattern", "no annotator configured");
        return Arc::new(PatternStructurer);
    };

    let client = match AnnotatorClient::new(url, config.http_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(url, error = %e, "annotator client unavailable; using pattern strategy");
            return Arc::new(PatternStructurer);
        }
    };

    match client.probe().await {
        Ok(()) => {
            tracing::info!(strategy = "linguistic", url, "annotator reachable");
            Arc::new(LinguisticStructurer::new(Arc::new(client)))
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "annotator probe failed; using pattern strategy");
            Arc::new(PatternStructurer)
        }
    }
}
