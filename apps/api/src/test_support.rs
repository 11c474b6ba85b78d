//! Shared fixtures for in-crate tests.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;

use crate::client::{Notification, Notifier};
use crate::config::Config;
use crate::llm_client::{ChatCompleter, Completion, LlmError, Sampling, DEFAULT_BASE_URL};
use crate::models::chat::PromptMessage;
use crate::settings::{SettingsError, SettingsStore};
use crate::state::AppState;

/// Serves `router` on an ephemeral localhost port for the rest of the test.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub fn test_config(api_key_var: &str) -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        llm_base_url: DEFAULT_BASE_URL.to_string(),
        llm_api_key_var: api_key_var.to_string(),
        llm_timeout_secs: 5,
        settings_path: String::new(),
    }
}

/// State with `completer` as upstream and an in-memory settings store.
pub fn test_state(completer: impl ChatCompleter + 'static, api_key_var: &str) -> AppState {
    test_state_with_settings(completer, api_key_var, Arc::new(MemorySettingsStore::default()))
}

pub fn test_state_with_settings(
    completer: impl ChatCompleter + 'static,
    api_key_var: &str,
    settings: Arc<dyn SettingsStore>,
) -> AppState {
    AppState {
        llm: Arc::new(completer),
        settings,
        config: test_config(api_key_var),
    }
}

/// [`SettingsStore`] that never touches the filesystem.
#[derive(Default)]
pub struct MemorySettingsStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.entries.lock().unwrap().remove(key))
    }

    fn snapshot(&self) -> Result<BTreeMap<String, Value>, SettingsError> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

enum Outcome {
    Reply(String),
    Fail(fn() -> LlmError),
}

struct StubInner {
    outcome: Outcome,
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, Vec<PromptMessage>, Sampling)>>,
}

/// Counting [`ChatCompleter`] that records its last call.
#[derive(Clone)]
pub struct StubCompleter {
    inner: Arc<StubInner>,
}

impl StubCompleter {
    fn with(outcome: Outcome) -> Self {
        Self {
            inner: Arc::new(StubInner {
                outcome,
                calls: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            }),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Outcome::Reply(text.to_string()))
    }

    pub fn failing(error: fn() -> LlmError) -> Self {
        Self::with(Outcome::Fail(error))
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn last_api_key(&self) -> Option<String> {
        let last = self.inner.last_call.lock().unwrap();
        last.as_ref().map(|(key, _, _)| key.clone())
    }

    pub fn last_prompt(&self) -> Option<Vec<PromptMessage>> {
        let last = self.inner.last_call.lock().unwrap();
        last.as_ref().map(|(_, prompt, _)| prompt.clone())
    }

    pub fn last_sampling(&self) -> Option<Sampling> {
        let last = self.inner.last_call.lock().unwrap();
        last.as_ref().map(|(_, _, sampling)| *sampling)
    }
}

#[async_trait]
impl ChatCompleter for StubCompleter {
    async fn complete(
        &self,
        api_key: &str,
        messages: &[PromptMessage],
        sampling: &Sampling,
    ) -> Result<Completion, LlmError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_call.lock().unwrap() =
            Some((api_key.to_string(), messages.to_vec(), *sampling));
        match &self.inner.outcome {
            Outcome::Reply(text) => Ok(Completion {
                text: text.clone(),
                usage: None,
            }),
            Outcome::Fail(error) => Err(error()),
        }
    }
}

/// Notifier that keeps every notification for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
