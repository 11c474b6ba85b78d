/// LLM Client — the single point of entry for chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the upstream LLM API directly.
/// The chat proxy depends on the [`ChatCompleter`] trait; [`LlmClient`] is the
/// production implementation.
///
/// Model: gpt-4o-mini (hardcoded, both chat endpoints use the same model)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::chat::PromptMessage;

/// The model used for every chat completion.
pub const MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Fixed per-endpoint sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    #[serde(flatten)]
    sampling: &'a Sampling,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Text of the first completion plus the upstream usage object, forwarded as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Value>,
}

/// A chat-completion backend. Carried in `AppState` as `Arc<dyn ChatCompleter>`.
///
/// The credential is passed per call: it is read from the environment on every
/// invocation and never stored.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        messages: &[PromptMessage],
        sampling: &Sampling,
    ) -> Result<Completion, LlmError>;
}

/// OpenAI-compatible chat-completions client. One POST per call, no retry,
/// no streaming.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatCompleter for LlmClient {
    async fn complete(
        &self,
        api_key: &str,
        messages: &[PromptMessage],
        sampling: &Sampling,
    ) -> Result<Completion, LlmError> {
        let request_body = CompletionRequest {
            model: MODEL,
            messages,
            sampling,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }

        let completion = parse_completion(&body)?;
        debug!(
            "LLM call succeeded: messages={}, reply_chars={}",
            messages.len(),
            completion.text.len()
        );
        Ok(completion)
    }
}

/// Pulls `error.message` out of an upstream error body, falling back to the raw body.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Extracts the first completion's text from a chat-completions response body.
fn parse_completion(body: &str) -> Result<Completion, LlmError> {
    let parsed: CompletionResponse = serde_json::from_str(body)?;
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or(LlmError::EmptyContent)?;
    Ok(Completion {
        text,
        usage: parsed.usage,
    })
}
