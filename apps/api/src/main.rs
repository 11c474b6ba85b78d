use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careerchat_api::config::{read_api_key, Config};
use careerchat_api::llm_client::{self, LlmClient};
use careerchat_api::routes::build_router;
use careerchat_api::settings::JsonFileSettingsStore;
use careerchat_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting careerchat API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        &config.llm_base_url,
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.llm_base_url
    );
    if read_api_key(&config.llm_api_key_var).is_none() {
        // Not fatal: each chat request re-reads the variable.
        tracing::warn!(
            "{} is not set; chat requests will fail until it is",
            config.llm_api_key_var
        );
    }

    // Load persisted settings
    let settings = JsonFileSettingsStore::open(&config.settings_path)?;

    let state = AppState {
        llm: Arc::new(llm),
        settings: Arc::new(settings),
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
