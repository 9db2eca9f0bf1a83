//! carelens-server
//!
//! HTTP surface for the analysis pipeline: chat, OCR, audio and text
//! sentiment, plus the session store and request-scoped uploads behind them.

pub mod config;
pub mod error;
pub mod middleware;
pub mod orchestrator;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};

use config::ServiceConfig;
use state::AppState;

/// Assemble the router with its middleware stack.
pub fn router(state: AppState, config: &ServiceConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static(routes::chat::SESSION_HEADER)]);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/llm-chat", post(routes::chat::llm_chat))
        .route("/health-chat", post(routes::chat::health_chat))
        .route("/ocr", post(routes::ocr::ocr))
        .route("/health-ocr", post(routes::ocr::health_ocr))
        .route("/process-audio", post(routes::audio::process_audio))
        .route("/text-sentiment", post(routes::sentiment::text_sentiment))
        .route("/sessions/{id}", delete(routes::sessions::end_session))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(axum_mw::from_fn_with_state(
            config.request_timeout(),
            middleware::deadline::enforce_deadline,
        ))
        .layer(axum_mw::from_fn(middleware::request_log::request_log))
        .layer(cors)
        .with_state(state)
}
