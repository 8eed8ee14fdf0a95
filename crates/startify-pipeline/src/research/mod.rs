//! Cache-or-compute research over a structured idea.
//!
//! Every sub-step absorbs its own failure and substitutes a deterministic
//! fallback, so [`ResearchStage::research`] always produces a result.

mod insights;
mod investors;
mod scrape;
mod summary;
mod trends;

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use startify_core::{CacheStore, InvestorProfile, ResearchResult, StructuredIdea};

use crate::llm::TextGenerator;

pub use insights::{competition_level, market_insights};
pub use investors::match_investors;
pub use scrape::{ReferenceFetcher, ScrapedPage};
pub use summary::{NO_SOURCES, NO_TEXT};
pub use trends::{mock_trends, trend_keywords, HttpTrendProvider, TrendProvider};

const SCRAPED_QUERIES: usize = 3;

/// Default cache lifetime for research results.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub struct ResearchStage {
    cache: Arc<dyn CacheStore>,
    fetcher: ReferenceFetcher,
    trends: Option<Arc<dyn TrendProvider>>,
    summarizer: Option<Arc<dyn TextGenerator>>,
    investors: Vec<InvestorProfile>,
    ttl: Duration,
}

impl ResearchStage {
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheStore>,
        fetcher: ReferenceFetcher,
        investors: Vec<InvestorProfile>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            trends: None,
            summarizer: None,
            investors,
            ttl: DEFAULT_TTL,
        }
    }

    #[must_use]
    pub fn with_trend_provider(mut self, provider: Arc<dyn TrendProvider>) -> Self {
        self.trends = Some(provider);
        self
    }

    #[must_use]
    pub fn with_summarizer(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.summarizer = Some(generator);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Research `idea`, serving from cache when a live entry exists.
    ///
    /// A cache hit performs no network or model calls. Cache read and write
    /// failures are logged and treated as a miss / skipped write.
    pub async fn research(&self, idea: &StructuredIdea) -> ResearchResult {
        let key = match fingerprint(idea) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(stage = "research", error = %e, "could not fingerprint idea; cache bypassed");
                None
            }
        };

        if let Some(key) = key.as_deref() {
            if let Some(hit) = self.cached(key).await {
                return hit;
            }
        }

        let result = self.compute(idea).await;

        if let Some(key) = key.as_deref() {
            match serde_json::to_value(&result) {
                Ok(value) => {
                    if let Err(e) = self.cache.put(key, value, self.ttl).await {
                        tracing::warn!(stage = "research", key, error = %e, "cache write failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(stage = "research", key, error = %e, "research result not serializable");
                }
            }
        }
        result
    }

    async fn cached(&self, key: &str) -> Option<ResearchResult> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value::<ResearchResult>(value) {
                Ok(result) => {
                    tracing::debug!(stage = "research", key, "cache hit");
                    Some(result)
                }
                Err(e) => {
                    tracing::warn!(stage = "research", key, error = %e, "cached research unreadable; recomputing");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(stage = "research", key, error = %e, "cache read failed; recomputing");
                None
            }
        }
    }

    async fn compute(&self, idea: &StructuredIdea) -> ResearchResult {
        let mut pages = Vec::new();
        for query in search_queries(idea).iter().take(SCRAPED_QUERIES) {
            pages.extend(self.fetcher.fetch(query).await);
        }
        tracing::debug!(stage = "research", pages = pages.len(), "reference pages collected");

        let trends = self.trend_scores(&idea.industry).await;
        let summary_text =
            summary::summarize(&pages, idea, self.summarizer.as_deref()).await;

        ResearchResult {
            competitors: insights::competitors(&pages),
            market_insights: insights::market_insights(&idea.industry, &trends),
            trends,
            summary_text,
            key_opportunities: insights::opportunities(idea),
            key_risks: insights::risks(idea),
            investors: investors::match_investors(&idea.industry, &self.investors),
        }
    }

    async fn trend_scores(&self, industry: &str) -> std::collections::BTreeMap<String, f64> {
        let Some(provider) = &self.trends else {
            return mock_trends(industry);
        };
        match provider.interest(&trend_keywords(industry)).await {
            Ok(scores) if !scores.is_empty() => scores,
            Ok(_) => {
                tracing::warn!(stage = "research", industry, "trend provider returned no scores; using mock data");
                mock_trends(industry)
            }
            Err(e) => {
                tracing::warn!(stage = "research", industry, error = %e, "trend provider failed; using mock data");
                mock_trends(industry)
            }
        }
    }
}

/// Cache key for `idea`: SHA-256 over its sorted-key JSON serialization.
///
/// # Errors
///
/// Returns `serde_json::Error` if the idea cannot be serialized.
pub fn fingerprint(idea: &StructuredIdea) -> Result<String, serde_json::Error> {
    // `serde_json::Value` objects are ordered maps, so this is canonical.
    let canonical = serde_json::to_string(&serde_json::to_value(idea)?)?;
    let digest = Sha256::digest(canonical.as_bytes());
    let mut key = String::with_capacity(9 + digest.len() * 2);
    key.push_str("research:");
    for byte in digest {
        let _ = write!(key, "{byte:02x}");
    }
    Ok(key)
}

/// Query strings derived from industry and audience.
#[must_use]
pub fn search_queries(idea: &StructuredIdea) -> [String; 4] {
    let industry = &idea.industry;
    let audience = &idea.target_audience;
    [
        format!("{industry} app {audience} competitors"),
        format!("{industry} app market size {audience}"),
        format!("{industry} {audience} trends"),
        format!("{industry} app retention strategies"),
    ]
}

#[cfg(test)]
#[path = "research_test.rs"]
mod tests;
