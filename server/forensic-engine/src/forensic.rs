//! Forensic heuristics: compare commit metadata against push metadata.

use chrono::Duration;

use crate::payload::{Commit, PushPayload};
use crate::types::{Finding, Findings};

/// Largest tolerated gap between the commit's authored time and the repository's last update.
pub const MAX_CLOCK_SKEW_SECS: i64 = 10 * 60;

/// Findings for one commit of a push. Each rule is evaluated independently.
pub fn analyze(commit: &Commit, payload: &PushPayload) -> Findings {
  let mut findings = analyze_push(payload);

  if commit.message().to_lowercase().contains("amend") {
    findings.insert(Finding::AmendUsed);
  }

  if let (Some(author), Some(pusher)) = (commit.author_identity(), payload.pusher_name()) {
    if author != pusher {
      findings.insert(Finding::AuthorPusherMismatch);
    }
  }

  // Not evaluable unless both sides parse.
  if let (Some(authored), Some(updated)) = (commit.timestamp, payload.repo_updated_at()) {
    let gap = authored - updated;
    let max = Duration::seconds(MAX_CLOCK_SKEW_SECS);
    if gap > max || gap < -max {
      findings.insert(Finding::TimeManipulation);
    }
  }

  findings
}

/// Findings that depend only on the push itself, for pushes without commits.
pub fn analyze_push(payload: &PushPayload) -> Findings {
  let mut findings = Findings::new();
  if payload.is_forced() {
    findings.insert(Finding::ForcePush);
  }
  findings
}
