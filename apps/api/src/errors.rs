use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::chat::ChatFailure;
use crate::settings::SettingsError;

/// Application-level error type for the settings and onboarding routes.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Settings(e) => {
                tracing::error!("Settings error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SETTINGS_ERROR",
                    "Settings could not be saved".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Errors of the chat proxy pipeline.
///
/// Every variant is answered with `500` and a flat `{error, details?}` body;
/// callers distinguish failures by message only.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("LLM API key is not configured")]
    Configuration { var: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to get a response from the AI service")]
    Upstream(#[from] LlmError),
}

impl ChatError {
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Configuration { .. } => "ConfigurationError",
            ChatError::Validation(_) => "ValidationError",
            ChatError::Upstream(_) => "UpstreamError",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ChatError::Configuration { var } => Some(format!("{var} is not set")),
            ChatError::Validation(_) => None,
            ChatError::Upstream(e) => Some(e.to_string()),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match &self {
            ChatError::Validation(msg) => tracing::warn!(kind = self.kind(), "{msg}"),
            _ => tracing::error!(kind = self.kind(), details = ?self.details(), "{self}"),
        }

        let body = ChatFailure {
            error: self.to_string(),
            details: self.details(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
