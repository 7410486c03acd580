//! Request/response types for the monitor service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
  pub ok: bool,
  pub risk_score: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
  pub ok: bool,
  pub error: String,
}
