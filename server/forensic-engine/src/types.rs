//! Assessment types: auth method, findings, pattern hits and the stored risk profile.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Authentication method
// ---------------------------------------------------------------------------

/// How the push was authenticated. Each variant carries an opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum AuthMethod {
  GitHubApp(String),
  GitHubActions(String),
  DeployKey(String),
  WebUI(String),
  OAuthClient(String),
  PersonalToken(String),
}

impl AuthMethod {
  pub fn id(&self) -> &str {
    match self {
      Self::GitHubApp(id)
      | Self::GitHubActions(id)
      | Self::DeployKey(id)
      | Self::WebUI(id)
      | Self::OAuthClient(id)
      | Self::PersonalToken(id) => id,
    }
  }

  /// Human-readable label for dashboards.
  pub fn label(&self) -> &'static str {
    match self {
      Self::GitHubApp(_) => "GitHub App",
      Self::GitHubActions(_) => "GitHub Actions",
      Self::DeployKey(_) => "Deploy Key / SSH",
      Self::WebUI(_) => "GitHub Web",
      Self::OAuthClient(_) => "OAuth / VS Code / Credential Manager",
      Self::PersonalToken(_) => "Personal Token / HTTPS Credential",
    }
  }

  pub fn is_personal_token(&self) -> bool {
    matches!(self, Self::PersonalToken(_))
  }
}

impl fmt::Display for AuthMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.label(), self.id())
  }
}

// ---------------------------------------------------------------------------
// Forensic findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Finding {
  ForcePush,
  AmendUsed,
  AuthorPusherMismatch,
  TimeManipulation,
}

impl Finding {
  pub const ALL: [Finding; 4] = [
    Finding::ForcePush,
    Finding::AmendUsed,
    Finding::AuthorPusherMismatch,
    Finding::TimeManipulation,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::ForcePush => "FORCE_PUSH",
      Self::AmendUsed => "AMEND_USED",
      Self::AuthorPusherMismatch => "AUTHOR_PUSHER_MISMATCH",
      Self::TimeManipulation => "TIME_MANIPULATION",
    }
  }
}

pub type Findings = BTreeSet<Finding>;

// ---------------------------------------------------------------------------
// Pattern hits
// ---------------------------------------------------------------------------

/// Where a catalog pattern was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum HitLocation {
  Message,
  File(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternHit {
  pub pattern: String,
  pub location: HitLocation,
}

impl PatternHit {
  pub fn in_message(pattern: &str) -> Self {
    Self {
      pattern: pattern.to_string(),
      location: HitLocation::Message,
    }
  }

  pub fn in_file(pattern: &str, path: &str) -> Self {
    Self {
      pattern: pattern.to_string(),
      location: HitLocation::File(path.to_string()),
    }
  }

  pub fn is_file(&self) -> bool {
    matches!(self.location, HitLocation::File(_))
  }

  pub fn is_message(&self) -> bool {
    matches!(self.location, HitLocation::Message)
  }
}

// ---------------------------------------------------------------------------
// Risk bands
// ---------------------------------------------------------------------------

/// Presentation buckets over the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
  Low,
  Medium,
  High,
}

impl RiskBand {
  pub fn from_score(score: u32) -> Self {
    match score {
      0..=4 => Self::Low,
      5..=9 => Self::Medium,
      _ => Self::High,
    }
  }
}

// ---------------------------------------------------------------------------
// Risk profile (output record)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
  pub messages: Vec<String>,
  pub files: Vec<String>,
}

/// One assessed push event. Built once by the engine and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
  pub time: DateTime<Utc>,
  pub repo: Option<String>,
  #[serde(rename = "ref")]
  pub git_ref: Option<String>,
  pub compare: Option<String>,
  pub pusher: Option<String>,
  pub sender: Option<String>,
  pub sender_type: Option<String>,
  pub ip: Option<String>,
  pub auth_method: AuthMethod,
  pub commit: CommitSummary,
  pub findings: Findings,
  pub pattern_hits: Vec<PatternHit>,
  pub risk_score: u32,
}

impl RiskProfile {
  pub fn band(&self) -> RiskBand {
    RiskBand::from_score(self.risk_score)
  }

  pub fn has(&self, finding: Finding) -> bool {
    self.findings.contains(&finding)
  }

  /// Distinct paths that matched any pattern, in hit order.
  pub fn suspicious_files(&self) -> Vec<&str> {
    let mut files: Vec<&str> = Vec::new();
    for hit in &self.pattern_hits {
      if let HitLocation::File(path) = &hit.location {
        if !files.contains(&path.as_str()) {
          files.push(path.as_str());
        }
      }
    }
    files
  }

  /// Patterns found in commit messages.
  pub fn suspicious_text(&self) -> Vec<&str> {
    self
      .pattern_hits
      .iter()
      .filter(|hit| hit.is_message())
      .map(|hit| hit.pattern.as_str())
      .collect()
  }
}
