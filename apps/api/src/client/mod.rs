//! Chat client — calls a chat endpoint on behalf of UI code.
//!
//! UI code only ever sees `Some(reply)` or `None`: every failure is turned
//! into exactly one [`Notification`] at this boundary. [`ChatClient::try_send`]
//! exposes the underlying `Result` for callers that want to handle errors.
//!
//! Overlapping sends are allowed and independent; nothing orders their
//! completion. Each send carries a fresh request id which the proxy echoes,
//! so a reply can never be attributed to the wrong send.

pub mod notify;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::chat::window::{window, CAREER_WINDOW};
use crate::models::chat::{ChatFailure, ChatRequest, ChatResponse, Message};

pub use notify::{Notification, Notifier, TracingNotifier};

const REQUEST_TIMEOUT_SECS: u64 = 120;
const GENERIC_FAILURE: &str = "Failed to get a response. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("chat service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("response belongs to request {received}, expected {expected}")]
    RequestMismatch { expected: String, received: String },
}

impl ClientError {
    /// Text shown to the user.
    fn user_message(&self) -> String {
        match self {
            ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Increments the in-flight count for its lifetime, so the loading flag is
/// cleared on every exit path, including early returns and dropped futures.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    endpoint_url: String,
    mode: Option<String>,
    bearer: Option<String>,
    in_flight: Arc<AtomicUsize>,
    notifier: Arc<dyn Notifier>,
}

impl ChatClient {
    pub fn new(
        endpoint_url: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            endpoint_url: endpoint_url.into(),
            mode: None,
            bearer: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
            notifier,
        })
    }

    /// Persona mode sent with every request, e.g. `"resume"`.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Bearer token forwarded as `Authorization` (the hosted functions gateway requires one).
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// True while at least one send is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Sends `message` with the trailing window of `history` and returns the
    /// assistant's reply, or `None` after notifying the user of the failure.
    pub async fn send_message(&self, message: &str, history: &[Message]) -> Option<String> {
        match self.try_send(message, history).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                debug!("chat send failed: {e}");
                self.notifier.notify(Notification {
                    title: "Chat error".to_string(),
                    description: e.user_message(),
                });
                None
            }
        }
    }

    /// Same as [`send_message`](Self::send_message) without the notification.
    pub async fn try_send(&self, message: &str, history: &[Message]) -> Result<String, ClientError> {
        let _loading = LoadingGuard::enter(&self.in_flight);

        let request_id = Uuid::new_v4().to_string();
        let body = ChatRequest {
            message: Some(message.to_string()),
            conversation_history: window(history, CAREER_WINDOW).to_vec(),
            mode: self.mode.clone(),
            request_id: Some(request_id.clone()),
        };

        let mut request = self.http.post(&self.endpoint_url).json(&body);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatFailure>(&text)
                .map(|f| f.error)
                .unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply = match serde_json::from_str::<ChatResponse>(&text) {
            Ok(ChatResponse::Reply(reply)) => reply,
            Ok(ChatResponse::Failure(failure)) => {
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    message: failure.error,
                })
            }
            Err(e) => return Err(ClientError::Decode(e.to_string())),
        };

        match reply.request_id {
            Some(received) if received != request_id => Err(ClientError::RequestMismatch {
                expected: request_id,
                received,
            }),
            _ => Ok(reply.response),
        }
    }
}
