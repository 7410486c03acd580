//! HTTP handlers for the monitor service.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Json;
use chrono::Utc;
use forensic_engine::{PushPayload, RequestHeaders, RiskProfile};
use tracing::{info, warn};

use crate::dashboard;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{IngestResponse, ListParams};

/// Rows shown on the dashboard.
pub const DASHBOARD_ROWS: usize = 200;

pub async fn health() -> &'static str {
  "ok"
}

pub async fn ingest(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
  let payload = PushPayload::from_slice(&body).map_err(|e| {
    warn!(error = %e, "ingest: payload is not a JSON object");
    ApiError::from(e)
  })?;

  let profile = state.engine.assess(&payload, &request_headers(&headers), Utc::now());
  let risk_score = profile.risk_score;
  info!(
    repo = profile.repo.as_deref().unwrap_or("-"),
    pusher = profile.pusher.as_deref().unwrap_or("-"),
    auth = %profile.auth_method,
    risk_score,
    band = ?profile.band(),
    "push assessed"
  );

  state.store.append(profile).await?;
  Ok(Json(IngestResponse { ok: true, risk_score }))
}

pub async fn list(
  State(state): State<Arc<AppState>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RiskProfile>>, ApiError> {
  Ok(Json(state.store.list(params.limit).await?))
}

pub async fn export(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RiskProfile>>, ApiError> {
  Ok(Json(state.store.export().await?))
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
  let events = state.store.list(Some(DASHBOARD_ROWS)).await?;
  Ok(Html(dashboard::render(&events)))
}

/// Header values that are not visible ASCII are dropped.
pub fn request_headers(map: &HeaderMap) -> RequestHeaders {
  map
    .iter()
    .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
    .collect()
}
