//! Structured error types for the event store.

use thiserror::Error;

/// Persistence failure. An empty store is never an error.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("database: {0}")]
  Database(#[from] sqlx_core::Error),

  #[error("invalid table name {name:?}: {reason}")]
  InvalidTable { name: String, reason: String },
}

impl StoreError {
  pub fn invalid_table(name: &str, reason: &str) -> Self {
    Self::InvalidTable {
      name: name.to_string(),
      reason: reason.to_string(),
    }
  }
}
