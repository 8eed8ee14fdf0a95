use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::PipelineError;

/// Source of keyword interest scores (0–100).
#[async_trait]
pub trait TrendProvider: Send + Sync {
    async fn interest(&self, keywords: &[String]) -> Result<BTreeMap<String, f64>, PipelineError>;
}

/// Keywords scored for an industry.
#[must_use]
pub fn trend_keywords(industry: &str) -> Vec<String> {
    vec![industry.to_string(), format!("{industry} app")]
}

/// Scores used when no provider is configured or the provider fails.
#[must_use]
pub fn mock_trends(industry: &str) -> BTreeMap<String, f64> {
    BTreeMap::from([
        (industry.to_string(), 75.5),
        (format!("{industry} app"), 62.3),
        ("mobile apps".to_string(), 80.0),
    ])
}

/// HTTP trend provider: `GET {url}?keywords=a,b` returning a JSON object of
/// keyword → score.
pub struct HttpTrendProvider {
    client: Client,
    url: String,
}

impl HttpTrendProvider {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("startify/0.1 (idea-pipeline)")
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    fn request_url(&self, keywords: &[String]) -> String {
        let encoded = keywords
            .iter()
            .map(|k| utf8_percent_encode(k, NON_ALPHANUMERIC).to_string())
            .collect::<Vec<_>>()
            .join(",");
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}keywords={encoded}", self.url)
    }
}

#[async_trait]
impl TrendProvider for HttpTrendProvider {
    async fn interest(&self, keywords: &[String]) -> Result<BTreeMap<String, f64>, PipelineError> {
        let url = self.request_url(keywords);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        let scores: BTreeMap<String, f64> = response.json().await?;
        Ok(scores
            .into_iter()
            .filter(|(_, score)| score.is_finite())
            .map(|(keyword, score)| (keyword, score.clamp(0.0, 100.0)))
            .collect())
    }
}
