//! Handler errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use event_store::StoreError;
use thiserror::Error;

use crate::types::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid payload: {0}")]
  Payload(#[from] serde_json::Error),

  #[error("store: {0}")]
  Store(#[from] StoreError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Payload(_) => StatusCode::BAD_REQUEST,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = ErrorBody {
      ok: false,
      error: self.to_string(),
    };
    (self.status(), Json(body)).into_response()
  }
}
