//! Healthdesk gateway: form intake, FAQ chatbot, and the static front end.
//! Composition is request-scoped; the only shared state is the store and the advisory chat
//! session cache.

pub mod error;
mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use healthdesk_core::{ChatResponder, SubmissionService};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub submissions: SubmissionService,
    pub chatbot: Arc<ChatResponder>,
}

/// Router with every route, the request logger, CORS, and the catch-all panic handler.
/// Paths without a route are served from `public_dir`.
pub fn build_app(state: AppState, public_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/submit-patient-support", post(handlers::submit_patient_support))
        .route("/submit-volunteer", post(handlers::submit_volunteer))
        .route("/submit-contact", post(handlers::submit_contact))
        .route("/api/chatbot", post(handlers::chatbot))
        .fallback_service(ServeDir::new(public_dir.into()))
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(log_request))
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    tracing::info!("[GATEWAY] {} {}", request.method(), request.uri());
    next.run(request).await
}
