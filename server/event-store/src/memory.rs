//! Volatile backend: bounded in-process ring, newest first.

use std::collections::VecDeque;

use forensic_engine::RiskProfile;
use tokio::sync::RwLock;

pub const DEFAULT_VOLATILE_BOUND: usize = 200;

/// Insert as the new head and evict from the tail down to `bound`.
pub(crate) fn push_bounded(events: &mut VecDeque<RiskProfile>, profile: RiskProfile, bound: usize) {
  events.push_front(profile);
  events.truncate(bound);
}

pub(crate) fn take_newest(events: &VecDeque<RiskProfile>, limit: usize) -> Vec<RiskProfile> {
  events.iter().take(limit).cloned().collect()
}

/// Lost on restart. Appends take the write lock, so readers never see the bound exceeded.
#[derive(Debug)]
pub struct VolatileStore {
  bound: usize,
  events: RwLock<VecDeque<RiskProfile>>,
}

impl VolatileStore {
  pub fn new(bound: usize) -> Self {
    let bound = bound.max(1);
    Self {
      bound,
      events: RwLock::new(VecDeque::with_capacity(bound)),
    }
  }

  pub fn bound(&self) -> usize {
    self.bound
  }

  pub async fn append(&self, profile: RiskProfile) {
    let mut events = self.events.write().await;
    push_bounded(&mut events, profile, self.bound);
  }

  pub async fn list(&self, limit: Option<usize>) -> Vec<RiskProfile> {
    let events = self.events.read().await;
    take_newest(&events, limit.unwrap_or(self.bound))
  }

  pub async fn export(&self) -> Vec<RiskProfile> {
    self.events.read().await.iter().cloned().collect()
  }
}

impl Default for VolatileStore {
  fn default() -> Self {
    Self::new(DEFAULT_VOLATILE_BOUND)
  }
}
