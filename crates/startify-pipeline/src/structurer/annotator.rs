use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// One token of a dependency-parsed document. Offsets are character offsets
/// into [`AnnotatedDoc::text`]; `head` is the index of the syntactic head
/// (the root points at itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub pos: String,
    pub dep: String,
    pub head: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

/// A document as returned by the annotation service (spaCy `Doc.to_json`
/// layout; unknown fields are ignored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDoc {
    pub text: String,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub ents: Vec<EntitySpan>,
}

impl AnnotatedDoc {
    /// Text between two character offsets. Out-of-range offsets are clamped.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let byte_at = |char_idx: usize| {
            self.text
                .char_indices()
                .nth(char_idx)
                .map_or(self.text.len(), |(b, _)| b)
        };
        let (from, to) = (byte_at(start), byte_at(end));
        if from >= to {
            return "";
        }
        &self.text[from..to]
    }

    #[must_use]
    pub fn token_text(&self, token: &Token) -> &str {
        self.slice(token.start, token.end)
    }

    /// Direct dependents of token `idx`, in document order.
    pub fn children(&self, idx: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens
            .iter()
            .filter(move |t| t.head == idx && t.id != idx)
    }
}

#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<AnnotatedDoc, PipelineError>;
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

/// HTTP client for the annotation service: `GET /health`, `POST /annotate`.
pub struct AnnotatorClient {
    client: Client,
    base_url: String,
}

impl AnnotatorClient {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("startify/0.1 (idea-pipeline)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Capability check; succeeds only on a 2xx from `/health`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] on network failure or
    /// [`PipelineError::UnexpectedStatus`] on a non-2xx response.
    pub async fn probe(&self) -> Result<(), PipelineError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Annotator for AnnotatorClient {
    async fn annotate(&self, text: &str) -> Result<AnnotatedDoc, PipelineError> {
        let url = format!("{}/annotate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AnnotateRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let doc: AnnotatedDoc = serde_json::from_value(body)
            .map_err(|e| PipelineError::Annotator(format!("unexpected document shape: {e}")))?;

        check_token_layout(&doc)?;
        Ok(doc)
    }
}

/// Token ids must equal their position, heads must point inside the
/// document, and offsets must not run backwards.
fn check_token_layout(doc: &AnnotatedDoc) -> Result<(), PipelineError> {
    for (idx, token) in doc.tokens.iter().enumerate() {
        if token.id != idx {
            return Err(PipelineError::Annotator(format!(
                "token at position {idx} has id {}",
                token.id
            )));
        }
        if token.head >= doc.tokens.len() {
            return Err(PipelineError::Annotator(format!(
                "token {idx} has out-of-range head {}",
                token.head
            )));
        }
        if token.start > token.end {
            return Err(PipelineError::Annotator(format!(
                "token {idx} starts at {} after its end {}",
                token.start, token.end
            )));
        }
    }
    Ok(())
}
