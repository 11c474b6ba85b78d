use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
///
/// The upstream API key is deliberately absent: the chat handlers read the
/// variable named by `llm_api_key_var` on every invocation, so a missing key
/// fails that request only and never startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm_base_url: String,
    pub llm_api_key_var: String,
    pub llm_timeout_secs: u64,
    pub settings_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            llm_api_key_var: std::env::var("LLM_API_KEY_VAR")
                .unwrap_or_else(|_| "OPENAI_API_KEY".to_string()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            settings_path: std::env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| "data/settings.json".to_string()),
        })
    }
}

/// Reads the upstream credential named by `var`. Empty values count as unset.
pub fn read_api_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
