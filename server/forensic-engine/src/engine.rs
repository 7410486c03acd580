//! Orchestrator: one push payload in, one risk profile out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::auth;
use crate::catalog::{self, PatternCatalog};
use crate::forensic;
use crate::headers::RequestHeaders;
use crate::payload::PushPayload;
use crate::score;
use crate::types::{CommitSummary, Findings, RiskProfile};

/// Stateless assessor. Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone, Default)]
pub struct ForensicEngine {
  catalog: Arc<PatternCatalog>,
}

impl ForensicEngine {
  pub fn new(catalog: PatternCatalog) -> Self {
    Self {
      catalog: Arc::new(catalog),
    }
  }

  pub fn with_defaults() -> Self {
    Self::default()
  }

  pub fn catalog(&self) -> &PatternCatalog {
    &self.catalog
  }

  /// Assess one push. Never fails: missing fields only narrow what can be found.
  pub fn assess(&self, payload: &PushPayload, headers: &RequestHeaders, now: DateTime<Utc>) -> RiskProfile {
    let auth_method = auth::classify(payload, headers);
    let commits = payload.commit_list();

    let messages: Vec<String> = commits.iter().map(|c| c.message().to_string()).collect();
    let mut files: Vec<String> = Vec::new();
    for commit in &commits {
      for path in commit.changed_files() {
        if !files.iter().any(|f| f == path) {
          files.push(path.to_string());
        }
      }
    }

    let findings: Findings = if commits.is_empty() {
      forensic::analyze_push(payload)
    } else {
      commits
        .iter()
        .flat_map(|c| forensic::analyze(c, payload))
        .collect()
    };

    let pattern_hits = catalog::match_patterns(&messages, &files, &self.catalog);
    let risk_score = score::score(&auth_method, &findings, &pattern_hits);

    debug!(
      repo = payload.repo_name().unwrap_or("-"),
      commits = commits.len(),
      findings = findings.len(),
      hits = pattern_hits.len(),
      risk_score,
      "push assessed"
    );

    RiskProfile {
      time: now,
      repo: payload.repo_name().map(str::to_string),
      git_ref: payload.git_ref.clone(),
      compare: payload.compare.clone(),
      pusher: payload.pusher_name().map(str::to_string),
      sender: payload.sender_login().map(str::to_string),
      sender_type: payload.sender_type().map(str::to_string),
      ip: headers.client_ip().map(str::to_string),
      auth_method,
      commit: CommitSummary { messages, files },
      findings,
      pattern_hits,
      risk_score,
    }
  }
}
