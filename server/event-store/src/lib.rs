//! Git Forensic Monitor: Event Store.
//!
//! Persists [`RiskProfile`] records and serves them back newest first under a retention
//! bound. The backend is picked once at construction; callers only see [`EventStore`].
//!
//! Concurrency: appends are serialized per store instance; reads run alongside them and
//! only ever observe whole records.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod postgres;

use forensic_engine::RiskProfile;
use tracing::{error, info};

pub use config::StoreConfig;
pub use error::StoreError;
pub use file::{FileStore, DEFAULT_FILE_BOUND};
pub use memory::{VolatileStore, DEFAULT_VOLATILE_BOUND};
pub use postgres::{LogStore, DEFAULT_TABLE};

#[derive(Debug)]
pub enum EventStore {
  Volatile(VolatileStore),
  File(FileStore),
  Postgres(LogStore),
}

impl EventStore {
  /// Build the configured backend. Only a database that cannot be reached fails here;
  /// an unreadable snapshot file opens as an empty store.
  pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
    let store = match config {
      StoreConfig::Volatile { bound } => Self::Volatile(VolatileStore::new(*bound)),
      StoreConfig::File { path, bound } => Self::File(FileStore::open(path.clone(), *bound).await),
      StoreConfig::Postgres {
        database_url,
        table,
        retention,
      } => Self::Postgres(LogStore::connect(database_url, table, *retention).await?),
    };
    info!(store = %config.describe(), "event store opened");
    Ok(store)
  }

  pub fn volatile() -> Self {
    Self::Volatile(VolatileStore::default())
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Volatile(_) => "memory",
      Self::File(_) => "file",
      Self::Postgres(_) => "postgres",
    }
  }

  /// Retention bound, `None` for an unbounded log.
  pub fn bound(&self) -> Option<usize> {
    match self {
      Self::Volatile(s) => Some(s.bound()),
      Self::File(s) => Some(s.bound()),
      Self::Postgres(s) => s.retention(),
    }
  }

  /// Add `profile` as the newest record, evicting the oldest beyond the bound.
  /// Failures are logged here and returned; the record is not stored.
  pub async fn append(&self, profile: RiskProfile) -> Result<(), StoreError> {
    let result = match self {
      Self::Volatile(s) => {
        s.append(profile).await;
        Ok(())
      }
      Self::File(s) => s.append(profile).await,
      Self::Postgres(s) => s.append(profile).await,
    };
    if let Err(e) = &result {
      error!(store = self.kind(), error = %e, "append failed");
    }
    result
  }

  /// Newest first, at most `limit` records (default: the bound).
  pub async fn list(&self, limit: Option<usize>) -> Result<Vec<RiskProfile>, StoreError> {
    match self {
      Self::Volatile(s) => Ok(s.list(limit).await),
      Self::File(s) => Ok(s.list(limit).await),
      Self::Postgres(s) => s.list(limit).await,
    }
  }

  /// Everything retained, in `list` order.
  pub async fn export(&self) -> Result<Vec<RiskProfile>, StoreError> {
    match self {
      Self::Volatile(s) => Ok(s.export().await),
      Self::File(s) => Ok(s.export().await),
      Self::Postgres(s) => s.export().await,
    }
  }
}
