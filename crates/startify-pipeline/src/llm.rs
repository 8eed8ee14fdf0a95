//! Chat-completions client for an OpenAI-compatible provider (`OpenRouter` by
//! default), behind the [`TextGenerator`] seam so tests can substitute canned
//! output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use startify_core::AppConfig;

use crate::error::PipelineError;

const SYSTEM_PROMPT: &str = "You are a concise startup research assistant.";

/// Per-call generation knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    /// Number of independent sequences to request.
    pub n: u32,
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    #[must_use]
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            n: 1,
            temperature: None,
        }
    }

    #[must_use]
    pub fn sequences(mut self, n: u32) -> Self {
        self.n = n.max(1);
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns one string per generated sequence. Never returns an empty vec
    /// on success.
    async fn complete(
        &self,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<Vec<String>, PipelineError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the chat-completions endpoint.
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        endpoint: &str,
        timeout_secs: u64,
    ) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("startify/0.1 (idea-pipeline)")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    /// Build a client when the model strategy is enabled in `config`,
    /// otherwise `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, PipelineError> {
        if !config.llm_enabled() {
            return Ok(None);
        }
        let Some(api_key) = config.openrouter_api_key.as_deref() else {
            return Ok(None);
        };
        Self::new(
            api_key,
            &config.openrouter_model,
            &config.openrouter_base_url,
            config.llm_timeout_secs,
        )
        .map(Some)
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn complete(
        &self,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<Vec<String>, PipelineError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: options.max_tokens,
            n: (options.n > 1).then_some(options.n),
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        parse_choices(body)
    }
}

fn parse_choices(body: serde_json::Value) -> Result<Vec<String>, PipelineError> {
    let parsed: ChatResponse = serde_json::from_value(body)
        .map_err(|e| PipelineError::Llm(format!("unexpected response format: {e}")))?;

    let contents: Vec<String> = parsed
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .collect();

    if contents.is_empty() {
        return Err(PipelineError::Llm(
            "response contained no message content".to_string(),
        ));
    }
    Ok(contents)
}
