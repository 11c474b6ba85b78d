//! Chat proxy pipeline — translates one client chat request into one upstream
//! chat-completion call.
//!
//! Flow: parse body → check credential → window history → build prompt →
//!       call upstream → reply.
//!
//! Stateless: nothing is read from or written to shared state except the
//! read-only `AppState`. Any failure ends the invocation with a `ChatError`;
//! there is no retry and no partial result.

use tracing::{debug, info};

use crate::chat::endpoint::ChatEndpoint;
use crate::chat::window::window;
use crate::config::read_api_key;
use crate::errors::ChatError;
use crate::models::chat::{ChatReply, ChatRequest, Message, PromptMessage};
use crate::state::AppState;

/// A request body that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub message: String,
    pub history: Vec<Message>,
    pub mode: Option<String>,
    pub request_id: Option<String>,
}

/// Parses and validates a raw request body.
///
/// Malformed JSON and a missing or blank `message` are both validation errors.
pub fn parse_request(body: &[u8]) -> Result<ValidatedRequest, ChatError> {
    let request: ChatRequest = serde_json::from_slice(body)
        .map_err(|e| ChatError::Validation(format!("request body is not valid JSON: {e}")))?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ChatError::Validation("message is required".to_string()))?;

    Ok(ValidatedRequest {
        message,
        history: request.conversation_history,
        mode: request.mode,
        request_id: request.request_id,
    })
}

/// Assembles the upstream prompt: persona first, then the windowed history
/// with roles derived from `isAI`, then the new user message last.
///
/// Pure; the same inputs always produce the same list.
pub fn build_prompt(
    endpoint: ChatEndpoint,
    mode: Option<&str>,
    history: &[Message],
    message: &str,
) -> Vec<PromptMessage> {
    let recent = window(history, endpoint.window_size());

    let mut prompt = Vec::with_capacity(recent.len() + 2);
    prompt.push(PromptMessage::system(endpoint.persona(mode)));
    prompt.extend(recent.iter().map(PromptMessage::from));
    prompt.push(PromptMessage::user(message));
    prompt
}

/// Runs one proxy invocation end to end.
#[tracing::instrument(name = "chat_proxy", skip_all, fields(endpoint = endpoint.name()))]
pub async fn run(
    endpoint: ChatEndpoint,
    state: &AppState,
    body: &[u8],
) -> Result<ChatReply, ChatError> {
    debug!("received {} byte body", body.len());

    let request = parse_request(body)?;
    let api_key =
        read_api_key(&state.config.llm_api_key_var).ok_or_else(|| ChatError::Configuration {
            var: state.config.llm_api_key_var.clone(),
        })?;
    debug!(
        history = request.history.len(),
        mode = request.mode.as_deref().unwrap_or("default"),
        "validated"
    );

    let prompt = build_prompt(
        endpoint,
        request.mode.as_deref(),
        &request.history,
        &request.message,
    );
    debug!(messages = prompt.len(), "prompt built");

    let completion = state
        .llm
        .complete(&api_key, &prompt, &endpoint.sampling())
        .await?;

    info!(reply_chars = completion.text.len(), "chat reply ready");
    Ok(ChatReply {
        response: completion.text,
        usage: completion.usage,
        request_id: request.request_id,
    })
}
