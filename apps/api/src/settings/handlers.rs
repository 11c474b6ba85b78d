//! Axum route handlers for onboarding progress and generic settings.
//!
//! Bodies are taken as raw bytes so a malformed payload is answered with the
//! `{error:{code,message}}` envelope rather than an extractor rejection.
//! Writes hit the disk, so they run on the blocking pool.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::settings::{OnboardingState, ONBOARDING_KEY, ONBOARDING_STEPS};
use crate::settings::SettingsError;
use crate::state::AppState;

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
}

fn validate_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::Validation("key cannot be blank".to_string()));
    }
    Ok(())
}

/// Runs a store operation off the async workers.
async fn blocking<T, F>(op: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, SettingsError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(anyhow::Error::from)?
        .map_err(AppError::from)
}

/// GET /api/v1/onboarding
///
/// Returns the stored onboarding state, or the initial state if none was saved yet.
pub async fn handle_get_onboarding(
    State(state): State<AppState>,
) -> Result<Json<OnboardingState>, AppError> {
    let onboarding = match state.settings.get(ONBOARDING_KEY)? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("stored onboarding state: {e}")))?,
        None => OnboardingState::default(),
    };
    Ok(Json(onboarding))
}

/// PUT /api/v1/onboarding
pub async fn handle_put_onboarding(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<OnboardingState>, AppError> {
    let onboarding: OnboardingState = decode_body(&body)?;
    if onboarding.current_step > ONBOARDING_STEPS {
        return Err(AppError::Validation(format!(
            "current_step must be at most {ONBOARDING_STEPS}"
        )));
    }

    let value = serde_json::to_value(&onboarding).map_err(anyhow::Error::from)?;
    let settings = state.settings.clone();
    blocking(move || settings.set(ONBOARDING_KEY, value)).await?;
    tracing::info!(
        step = onboarding.current_step,
        completed = onboarding.completed,
        "Onboarding state saved"
    );
    Ok(Json(onboarding))
}

/// GET /api/v1/settings/:key
pub async fn handle_get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    validate_key(&key)?;
    state
        .settings
        .get(&key)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Setting '{key}' not found")))
}

/// PUT /api/v1/settings/:key
pub async fn handle_put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    validate_key(&key)?;
    let value: Value = decode_body(&body)?;
    let settings = state.settings.clone();
    blocking(move || settings.set(&key, value)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/settings/:key
pub async fn handle_delete_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    validate_key(&key)?;
    let settings = state.settings.clone();
    let removed = {
        let key = key.clone();
        blocking(move || settings.remove(&key)).await?
    };
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::NotFound(format!("Setting '{key}' not found"))),
    }
}

/// GET /api/v1/settings
pub async fn handle_list_settings(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Value>>, AppError> {
    Ok(Json(state.settings.snapshot()?))
}
