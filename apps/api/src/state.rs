use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatCompleter;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only from the chat path; invocations share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Upstream chat-completion backend. Default: `LlmClient`.
    pub llm: Arc<dyn ChatCompleter>,
    pub settings: Arc<dyn SettingsStore>,
    pub config: Config,
}
