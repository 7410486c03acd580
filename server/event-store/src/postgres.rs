//! Durable-log backend: append-only PostgreSQL table, one row per profile.
//!
//! Insertion order is the `BIGSERIAL` id; reads go newest first. No retention bound
//! unless one is configured, in which case eviction runs in the insert's transaction.

use std::time::Duration;

use forensic_engine::RiskProfile;
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgPoolOptions, PgRow, Postgres};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::StoreError;

pub const DEFAULT_TABLE: &str = "push_events";

/// Fail fast instead of queueing behind an unreachable database.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct LogStore {
  pool: PgPool,
  table: String,
  retention: Option<usize>,
  /// One append at a time per instance, so eviction never races an insert.
  write_lock: Mutex<()>,
}

impl LogStore {
  pub async fn connect(database_url: &str, table: &str, retention: Option<usize>) -> Result<Self, StoreError> {
    validate_table(table)?;
    let pool = PgPoolOptions::new()
      .max_connections(MAX_CONNECTIONS)
      .acquire_timeout(ACQUIRE_TIMEOUT)
      .connect(database_url)
      .await?;
    Self::from_pool(pool, table, retention).await
  }

  /// Use an existing pool; creates the table if needed.
  pub async fn from_pool(pool: PgPool, table: &str, retention: Option<usize>) -> Result<Self, StoreError> {
    validate_table(table)?;
    let ddl = format!(
      "CREATE TABLE IF NOT EXISTS {table} (
        id BIGSERIAL PRIMARY KEY,
        received_at TIMESTAMPTZ NOT NULL,
        repo TEXT,
        risk_score BIGINT NOT NULL,
        profile TEXT NOT NULL
      )"
    );
    query::<Postgres>(&ddl).execute(&pool).await?;
    info!(table, retention = ?retention, "event log table ready");
    Ok(Self {
      pool,
      table: table.to_string(),
      retention: retention.map(|r| r.max(1)),
      write_lock: Mutex::new(()),
    })
  }

  pub fn table(&self) -> &str {
    &self.table
  }

  pub fn retention(&self) -> Option<usize> {
    self.retention
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  pub async fn append(&self, profile: RiskProfile) -> Result<(), StoreError> {
    let body = serde_json::to_string(&profile)?;
    let insert = format!(
      "INSERT INTO {} (received_at, repo, risk_score, profile) VALUES ($1, $2, $3, $4)",
      self.table
    );
    let evict = format!(
      "DELETE FROM {t} WHERE id <= (SELECT id FROM {t} ORDER BY id DESC OFFSET $1 LIMIT 1)",
      t = self.table
    );

    let _guard = self.write_lock.lock().await;
    let mut tx = self.pool.begin().await?;
    query::<Postgres>(&insert)
      .bind(profile.time)
      .bind(profile.repo.as_deref())
      .bind(i64::from(profile.risk_score))
      .bind(body)
      .execute(&mut *tx)
      .await?;
    if let Some(bound) = self.retention {
      query::<Postgres>(&evict).bind(to_i64(bound)).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
  }

  pub async fn list(&self, limit: Option<usize>) -> Result<Vec<RiskProfile>, StoreError> {
    match limit.or(self.retention) {
      Some(limit) => {
        let sql = format!("SELECT profile FROM {} ORDER BY id DESC LIMIT $1", self.table);
        let rows = query::<Postgres>(&sql).bind(to_i64(limit)).fetch_all(&self.pool).await?;
        Ok(decode_rows(rows))
      }
      None => self.export().await,
    }
  }

  pub async fn export(&self) -> Result<Vec<RiskProfile>, StoreError> {
    let sql = format!("SELECT profile FROM {} ORDER BY id DESC", self.table);
    let rows = query::<Postgres>(&sql).fetch_all(&self.pool).await?;
    Ok(decode_rows(rows))
  }
}

/// Rows that no longer parse are skipped and logged; callers only see whole records.
fn decode_rows(rows: Vec<PgRow>) -> Vec<RiskProfile> {
  rows
    .into_iter()
    .filter_map(|row| {
      let raw: String = match row.try_get("profile") {
        Ok(raw) => raw,
        Err(e) => {
          warn!(error = %e, "event row unreadable");
          return None;
        }
      };
      match serde_json::from_str(&raw) {
        Ok(profile) => Some(profile),
        Err(e) => {
          warn!(error = %e, "event row is not a valid profile");
          None
        }
      }
    })
    .collect()
}

fn to_i64(n: usize) -> i64 {
  i64::try_from(n).unwrap_or(i64::MAX)
}

/// Table names are interpolated into SQL, so only plain lowercase identifiers pass.
pub fn validate_table(name: &str) -> Result<(), StoreError> {
  if name.is_empty() || name.len() > 63 {
    return Err(StoreError::invalid_table(name, "must be 1-63 characters"));
  }
  let mut chars = name.chars();
  let first_ok = chars
    .next()
    .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
  if !first_ok || !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
    return Err(StoreError::invalid_table(name, "expected [a-z_][a-z0-9_]*"));
  }
  Ok(())
}
