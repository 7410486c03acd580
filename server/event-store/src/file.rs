//! Durable-file backend: the whole sequence lives in one JSON array file.
//!
//! Every append rewrites the file (temp file + fsync + rename), so a crash leaves
//! either the old or the new snapshot on disk. Reads are served from memory; the
//! in-memory copy is replaced only after the write succeeded.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use forensic_engine::RiskProfile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::memory::{push_bounded, take_newest};

pub const DEFAULT_FILE_BOUND: usize = 2000;

#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  bound: usize,
  events: RwLock<VecDeque<RiskProfile>>,
  /// Serializes the read-modify-write of appends.
  write_lock: Mutex<()>,
}

impl FileStore {
  /// Load the snapshot at `path`. A missing or unreadable file gives an empty store;
  /// a snapshot that does not parse is moved aside first.
  pub async fn open(path: impl Into<PathBuf>, bound: usize) -> Self {
    let path = path.into();
    let bound = bound.max(1);
    let events = match load(&path, bound).await {
      Ok(events) => {
        info!(path = %path.display(), events = events.len(), "event file loaded");
        events
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "event file unreadable, starting empty");
        if matches!(e, StoreError::Json(_)) {
          set_aside(&path).await;
        }
        VecDeque::new()
      }
    };
    Self {
      path,
      bound,
      events: RwLock::new(events),
      write_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn bound(&self) -> usize {
    self.bound
  }

  pub async fn append(&self, profile: RiskProfile) -> Result<(), StoreError> {
    let _guard = self.write_lock.lock().await;
    let mut next = self.events.read().await.clone();
    push_bounded(&mut next, profile, self.bound);
    self.persist(&next).await?;
    *self.events.write().await = next;
    Ok(())
  }

  pub async fn list(&self, limit: Option<usize>) -> Vec<RiskProfile> {
    let events = self.events.read().await;
    take_newest(&events, limit.unwrap_or(self.bound))
  }

  pub async fn export(&self) -> Vec<RiskProfile> {
    self.events.read().await.iter().cloned().collect()
  }

  async fn persist(&self, events: &VecDeque<RiskProfile>) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(events)?;
    let tmp = sibling(&self.path, ".tmp");
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(&bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&tmp, &self.path).await?;
    Ok(())
  }
}

async fn load(path: &Path, bound: usize) -> Result<VecDeque<RiskProfile>, StoreError> {
  let raw = match fs::read(path).await {
    Ok(raw) => raw,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(VecDeque::new()),
    Err(e) => return Err(e.into()),
  };
  let mut events: VecDeque<RiskProfile> = serde_json::from_slice(&raw)?;
  events.truncate(bound);
  Ok(events)
}

/// Keep a corrupt snapshot for inspection instead of overwriting it on the next append.
async fn set_aside(path: &Path) {
  let target = sibling(path, ".corrupt");
  match fs::rename(path, &target).await {
    Ok(()) => warn!(path = %target.display(), "corrupt event file moved aside"),
    Err(e) => warn!(path = %path.display(), error = %e, "could not move corrupt event file"),
  }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
  let mut name: OsString = path.as_os_str().to_owned();
  name.push(suffix);
  PathBuf::from(name)
}
