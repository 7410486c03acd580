//! Risk score: fixed additive weights over auth, findings and pattern hits.

use crate::types::{AuthMethod, Finding, Findings, PatternHit};

pub const FORCE_PUSH_WEIGHT: u32 = 3;
pub const AMEND_WEIGHT: u32 = 3;
pub const AUTHOR_MISMATCH_WEIGHT: u32 = 4;
pub const TIME_MANIPULATION_WEIGHT: u32 = 4;
pub const SUSPICIOUS_FILE_WEIGHT: u32 = 5;
pub const SUSPICIOUS_TEXT_WEIGHT: u32 = 5;
pub const PERSONAL_TOKEN_WEIGHT: u32 = 4;

fn finding_weight(finding: Finding) -> u32 {
  match finding {
    Finding::ForcePush => FORCE_PUSH_WEIGHT,
    Finding::AmendUsed => AMEND_WEIGHT,
    Finding::AuthorPusherMismatch => AUTHOR_MISMATCH_WEIGHT,
    Finding::TimeManipulation => TIME_MANIPULATION_WEIGHT,
  }
}

/// Sum every satisfied rule. File and message hits count once each, not per hit.
pub fn score(auth: &AuthMethod, findings: &Findings, hits: &[PatternHit]) -> u32 {
  let file_hit = hits.iter().any(PatternHit::is_file);
  let message_hit = hits.iter().any(PatternHit::is_message);

  let mut score: u32 = findings.iter().map(|f| finding_weight(*f)).sum();
  if file_hit {
    score += SUSPICIOUS_FILE_WEIGHT;
  }
  if message_hit {
    score += SUSPICIOUS_TEXT_WEIGHT;
  }
  // PAT combined with rewriting or dropper files.
  if auth.is_personal_token() && (file_hit || !findings.is_empty()) {
    score += PERSONAL_TOKEN_WEIGHT;
  }
  score
}
