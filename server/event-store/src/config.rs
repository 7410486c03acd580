//! Backend selection, decided once at startup.

use std::path::PathBuf;

use crate::file::DEFAULT_FILE_BOUND;
use crate::memory::DEFAULT_VOLATILE_BOUND;
use crate::postgres::DEFAULT_TABLE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
  Volatile { bound: usize },
  File { path: PathBuf, bound: usize },
  Postgres {
    database_url: String,
    table: String,
    retention: Option<usize>,
  },
}

impl StoreConfig {
  pub fn volatile() -> Self {
    Self::Volatile {
      bound: DEFAULT_VOLATILE_BOUND,
    }
  }

  pub fn file(path: impl Into<PathBuf>) -> Self {
    Self::File {
      path: path.into(),
      bound: DEFAULT_FILE_BOUND,
    }
  }

  pub fn postgres(database_url: impl Into<String>) -> Self {
    Self::Postgres {
      database_url: database_url.into(),
      table: DEFAULT_TABLE.to_string(),
      retention: None,
    }
  }

  /// Override the retention bound of whichever backend is selected.
  pub fn with_retention(self, retention: usize) -> Self {
    match self {
      Self::Volatile { .. } => Self::Volatile { bound: retention },
      Self::File { path, .. } => Self::File { path, bound: retention },
      Self::Postgres {
        database_url, table, ..
      } => Self::Postgres {
        database_url,
        table,
        retention: Some(retention),
      },
    }
  }

  /// Short description for logs; never includes credentials.
  pub fn describe(&self) -> String {
    match self {
      Self::Volatile { bound } => format!("memory (bound {})", bound),
      Self::File { path, bound } => format!("file {} (bound {})", path.display(), bound),
      Self::Postgres { table, retention, .. } => match retention {
        Some(r) => format!("postgres table {} (bound {})", table, r),
        None => format!("postgres table {} (unbounded)", table),
      },
    }
  }
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self::volatile()
  }
}
