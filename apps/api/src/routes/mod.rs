pub mod health;

use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::chat::handlers as chat;
use crate::chat::ChatEndpoint;
use crate::settings::handlers as settings;
use crate::state::AppState;

/// Permissive CORS for the browser client. Preflight requests are answered by
/// the layer itself and never reach a handler.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat proxy
        .route(
            ChatEndpoint::Career.path(),
            post(chat::handle_career_chat),
        )
        .route(ChatEndpoint::Voice.path(), post(chat::handle_voice_chat))
        // Onboarding / settings
        .route(
            "/api/v1/onboarding",
            get(settings::handle_get_onboarding).put(settings::handle_put_onboarding),
        )
        .route("/api/v1/settings", get(settings::handle_list_settings))
        .route(
            "/api/v1/settings/:key",
            get(settings::handle_get_setting)
                .put(settings::handle_put_setting)
                .delete(settings::handle_delete_setting),
        )
        .layer(cors_layer())
        .with_state(state)
}
