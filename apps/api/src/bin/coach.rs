//! Terminal chat against a running careerchat API.
//!
//! Environment:
//! - `COACH_URL`: API base URL (default `http://localhost:8080`)
//! - `COACH_ENDPOINT`: `career` (default) or `voice`
//! - `COACH_MODE`: persona mode, e.g. `resume`
//! - `COACH_TOKEN`: bearer token forwarded as `Authorization`

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careerchat_api::chat::ChatEndpoint;
use careerchat_api::client::{ChatClient, TracingNotifier};
use careerchat_api::models::chat::ConversationHistory;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url = std::env::var("COACH_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let endpoint = match std::env::var("COACH_ENDPOINT").as_deref() {
        Ok("voice") => ChatEndpoint::Voice,
        Ok("career") | Err(_) => ChatEndpoint::Career,
        Ok(other) => bail!("COACH_ENDPOINT must be 'career' or 'voice', got '{other}'"),
    };

    let mut client = ChatClient::new(
        format!("{}{}", base_url.trim_end_matches('/'), endpoint.path()),
        Arc::new(TracingNotifier),
    )?;
    if let Ok(mode) = std::env::var("COACH_MODE") {
        client = client.with_mode(mode);
    }
    if let Ok(token) = std::env::var("COACH_TOKEN") {
        client = client.with_bearer(token);
    }

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("Connected to {endpoint}. Empty line or Ctrl-D to quit.\n").as_bytes())
        .await?;

    let mut history = ConversationHistory::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        // History sent with a turn excludes the turn itself.
        let reply = client.send_message(line, history.messages()).await;
        history.push_user(line);
        if let Some(reply) = reply {
            stdout.write_all(format!("{reply}\n\n").as_bytes()).await?;
            history.push_assistant(reply);
        }
    }

    Ok(())
}
