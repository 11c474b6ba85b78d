//! Axum route handlers for the chat endpoints.
//!
//! Bodies are taken as raw bytes so that malformed JSON goes through the same
//! `{error}` envelope as every other failure instead of an extractor rejection.

use axum::{extract::State, Json};
use bytes::Bytes;

use crate::chat::endpoint::ChatEndpoint;
use crate::chat::proxy;
use crate::errors::ChatError;
use crate::models::chat::ChatReply;
use crate::state::AppState;

/// POST /api/v1/career-chat
pub async fn handle_career_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ChatError> {
    proxy::run(ChatEndpoint::Career, &state, &body).await.map(Json)
}

/// POST /api/v1/voice-chat
pub async fn handle_voice_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ChatError> {
    proxy::run(ChatEndpoint::Voice, &state, &body).await.map(Json)
}
