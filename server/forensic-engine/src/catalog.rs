//! Catalog of known-malicious string signatures and the matcher that scans for them.

use std::collections::HashSet;

use crate::types::PatternHit;

/// Signatures shipped by default: dropper filenames, obfuscated script tokens and
/// history-rewriting git flags.
pub const DEFAULT_PATTERNS: &[&str] = &[
  "temp_interactive_push.bat",
  "global['!']",
  "_$_1e42",
  "--no-verify",
  "--amend",
  "commit --amend",
];

/// Ordered, duplicate-free set of literal patterns. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCatalog {
  patterns: Vec<String>,
}

impl PatternCatalog {
  /// Build from patterns in order; empty and repeated entries are dropped.
  pub fn new<I, S>(patterns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut catalog = Self { patterns: Vec::new() };
    catalog.extend(patterns);
    catalog
  }

  /// Default catalog plus extra entries appended after it.
  pub fn with_extra<I, S>(mut self, extra: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.extend(extra);
    self
  }

  fn extend<I, S>(&mut self, patterns: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for p in patterns {
      let p = p.into();
      if !p.is_empty() && !self.patterns.contains(&p) {
        self.patterns.push(p);
      }
    }
  }

  pub fn patterns(&self) -> &[String] {
    &self.patterns
  }

  pub fn len(&self) -> usize {
    self.patterns.len()
  }

  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }
}

impl Default for PatternCatalog {
  fn default() -> Self {
    Self::new(DEFAULT_PATTERNS.iter().copied())
  }
}

/// Scan commit messages and changed paths for catalog patterns (literal substrings).
///
/// A pattern found in several messages yields one message hit; a pattern found in
/// several files yields one hit per distinct file. Hits follow catalog order, then
/// file order.
pub fn match_patterns(messages: &[String], files: &[String], catalog: &PatternCatalog) -> Vec<PatternHit> {
  let mut hits = Vec::new();
  for pattern in catalog.patterns() {
    if messages.iter().any(|m| m.contains(pattern.as_str())) {
      hits.push(PatternHit::in_message(pattern));
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for path in files {
      if path.contains(pattern.as_str()) && seen.insert(path.as_str()) {
        hits.push(PatternHit::in_file(pattern, path));
      }
    }
  }
  hits
}
