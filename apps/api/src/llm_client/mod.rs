//! LLM client: the single point of entry for external completion calls.
//!
//! No other module may call a model provider directly. Callers depend on the
//! `CompletionClient` trait so tests can script replies without the network.
//!
//! Models are hardcoded per provider to prevent drift.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{LlmConfig, LlmProvider};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub const ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
pub const OPENAI_MODEL: &str = "gpt-4";
/// Low temperature keeps suggestion wording stable between requests.
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1024;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),
}

/// An opaque text-completion service: prompt in, free-form text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body accepted by both the Messages and Chat Completions APIs.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

/// Provider-specific payload decoding.
fn response_text(provider: LlmProvider, body: &str) -> Result<String, CompletionError> {
    let text = match provider {
        LlmProvider::Anthropic => serde_json::from_str::<AnthropicResponse>(body)?
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text),
        LlmProvider::OpenAi => serde_json::from_str::<OpenAiResponse>(body)?
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content),
    };

    text.filter(|t| !t.trim().is_empty())
        .ok_or(CompletionError::EmptyContent)
}

/// Both providers wrap failures as `{"error": {"message": ...}}`.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body)
}

/// The production completion client, dispatching on the configured provider.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(config.timeout)
                .build()
                .context("Failed to build HTTP client")?,
            provider: config.provider,
            endpoint: match config.provider {
                LlmProvider::Anthropic => ANTHROPIC_API_URL,
                LlmProvider::OpenAi => OPENAI_API_URL,
            }
            .to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn model(&self) -> &'static str {
        match self.provider {
            LlmProvider::Anthropic => ANTHROPIC_MODEL,
            LlmProvider::OpenAi => OPENAI_MODEL,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String) -> Self {
        self.client = Client::builder()
            .no_proxy()
            .timeout(self.timeout)
            .build()
            .unwrap();
        self.endpoint = endpoint;
        self
    }

    fn request(&self, api_key: &str, prompt: &str) -> reqwest::RequestBuilder {
        let messages = vec![ChatMessage {
            role: "user",
            content: prompt,
        }];

        match self.provider {
            LlmProvider::Anthropic => self
                .client
                .post(&self.endpoint)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&ChatRequest {
                    model: ANTHROPIC_MODEL,
                    max_tokens: MAX_TOKENS,
                    temperature: TEMPERATURE,
                    messages,
                }),
            LlmProvider::OpenAi => self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&ChatRequest {
                    model: OPENAI_MODEL,
                    max_tokens: MAX_TOKENS,
                    temperature: TEMPERATURE,
                    messages,
                }),
        }
    }

    /// Retries transport failures, 429 (rate limit) and 5xx errors with exponential backoff.
    async fn call_with_retries(&self, api_key: &str, prompt: &str) -> Result<String, CompletionError> {
        let mut last_error: Option<CompletionError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.request(api_key, prompt).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CompletionError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read LLM response body: {e}");
                    last_error = Some(CompletionError::Http(e));
                    continue;
                }
            };

            if status.as_u16() == 429 || status.is_server_error() {
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(CompletionError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                return Err(CompletionError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let text = response_text(self.provider, &body)?;
            debug!(model = self.model(), chars = text.len(), "LLM call succeeded");
            return Ok(text);
        }

        Err(last_error.unwrap_or(CompletionError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey(self.provider.api_key_var()))?;

        tokio::time::timeout(self.timeout, self.call_with_retries(api_key, prompt))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout))?
    }
}

/// Scripted completion client for tests: replies with fixed text or fails.
#[cfg(test)]
pub struct ScriptedCompletion {
    reply: Option<String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl ScriptedCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: Default::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.reply.clone().ok_or(CompletionError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        })
    }
}
