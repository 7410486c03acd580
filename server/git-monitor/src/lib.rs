//! Git Forensic Monitor service.
//!
//! HTTP wrapper around the forensic engine and the event store: ingests push webhooks,
//! keeps the assessed profiles, and serves a dashboard plus JSON read endpoints.

mod dashboard;
mod error;
mod handlers;
mod state;
mod types;

pub mod config;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use dashboard::render as render_dashboard;
pub use error::ApiError;
pub use handlers::{export, health, index, ingest, list, request_headers, DASHBOARD_ROWS};
pub use state::AppState;
pub use types::{IngestResponse, ListParams};

/// Largest accepted webhook body.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(handlers::index))
    .route("/health", get(handlers::health))
    .route("/git-monitor", post(handlers::ingest))
    .route("/events", get(handlers::list))
    .route("/export", get(handlers::export))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
