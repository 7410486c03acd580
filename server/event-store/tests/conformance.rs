//! One contract, every backend: ordering, retention, export round-trip, concurrent appends.
//!
//! The Postgres backend runs only when `TEST_DATABASE_URL` points at a scratch database;
//! each run uses its own table and drops it afterwards.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use event_store::{EventStore, FileStore, LogStore, VolatileStore};
use forensic_engine::types::CommitSummary;
use forensic_engine::{AuthMethod, Findings, RiskProfile};
use sqlx_core::query::query;
use sqlx_postgres::{PgPool, Postgres};

fn profile(i: usize) -> RiskProfile {
  RiskProfile {
    time: Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap() + Duration::seconds(i as i64),
    repo: Some(format!("acme/repo-{i}")),
    git_ref: Some("refs/heads/main".into()),
    compare: None,
    pusher: Some("alice".into()),
    sender: Some("alice".into()),
    sender_type: Some("User".into()),
    ip: None,
    auth_method: AuthMethod::PersonalToken("pat-unknown".into()),
    commit: CommitSummary {
      messages: vec![format!("commit {i}")],
      files: vec![format!("src/file_{i}.rs")],
    },
    findings: Findings::new(),
    pattern_hits: Vec::new(),
    risk_score: i as u32,
  }
}

fn repos(events: &[RiskProfile]) -> Vec<String> {
  events.iter().map(|p| p.repo.clone().unwrap_or_default()).collect()
}

/// Holds whatever must outlive the store (temp dirs, scratch tables).
enum Guard {
  None,
  Dir(tempfile::TempDir),
  Table(PgPool, String),
}

impl Guard {
  async fn cleanup(self) {
    if let Guard::Table(pool, table) = self {
      let sql = format!("DROP TABLE IF EXISTS {table}");
      let _ = query::<Postgres>(&sql).execute(&pool).await;
    }
  }
}

/// Every available backend, each bounded to `bound`.
async fn backends(bound: usize) -> Vec<(EventStore, Guard)> {
  let mut out = vec![(EventStore::Volatile(VolatileStore::new(bound)), Guard::None)];

  let dir = tempfile::tempdir().unwrap();
  let file = FileStore::open(dir.path().join("events.json"), bound).await;
  out.push((EventStore::File(file), Guard::Dir(dir)));

  if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
    let pool = PgPool::connect(&url).await.unwrap();
    let table = format!("push_events_{}", uuid::Uuid::new_v4().simple());
    let log = LogStore::from_pool(pool.clone(), &table, Some(bound)).await.unwrap();
    out.push((EventStore::Postgres(log), Guard::Table(pool, table)));
  }
  out
}

#[tokio::test]
async fn empty_store_lists_nothing() {
  for (store, guard) in backends(5).await {
    assert!(store.list(None).await.unwrap().is_empty(), "{}", store.kind());
    assert!(store.export().await.unwrap().is_empty(), "{}", store.kind());
    guard.cleanup().await;
  }
}

#[tokio::test]
async fn list_is_newest_first() {
  for (store, guard) in backends(10).await {
    for i in 0..3 {
      store.append(profile(i)).await.unwrap();
    }
    let listed = store.list(None).await.unwrap();
    assert_eq!(repos(&listed), vec!["acme/repo-2", "acme/repo-1", "acme/repo-0"], "{}", store.kind());
    guard.cleanup().await;
  }
}

#[tokio::test]
async fn retention_keeps_most_recent_bound() {
  let bound = 5;
  for (store, guard) in backends(bound).await {
    for i in 0..bound + 3 {
      store.append(profile(i)).await.unwrap();
    }
    let listed = store.list(None).await.unwrap();
    let expected: Vec<String> = (3..8).rev().map(|i| format!("acme/repo-{i}")).collect();
    assert_eq!(repos(&listed), expected, "{}", store.kind());
    assert_eq!(store.export().await.unwrap().len(), bound, "{}", store.kind());
    assert_eq!(store.bound(), Some(bound));
    guard.cleanup().await;
  }
}

#[tokio::test]
async fn list_respects_limit() {
  for (store, guard) in backends(10).await {
    for i in 0..6 {
      store.append(profile(i)).await.unwrap();
    }
    let two = store.list(Some(2)).await.unwrap();
    assert_eq!(repos(&two), vec!["acme/repo-5", "acme/repo-4"], "{}", store.kind());
    assert_eq!(store.list(Some(100)).await.unwrap().len(), 6, "{}", store.kind());
    assert!(store.list(Some(0)).await.unwrap().is_empty(), "{}", store.kind());
    guard.cleanup().await;
  }
}

#[tokio::test]
async fn export_round_trip_puts_latest_first() {
  for (store, guard) in backends(4).await {
    for i in 0..6 {
      store.append(profile(i)).await.unwrap();
    }
    let latest = profile(42);
    store.append(latest.clone()).await.unwrap();
    let exported = store.export().await.unwrap();
    assert_eq!(exported[0], latest, "{}", store.kind());
    assert_eq!(exported, store.list(None).await.unwrap(), "{}", store.kind());
    guard.cleanup().await;
  }
}

#[tokio::test]
async fn concurrent_appends_never_exceed_bound() {
  let bound = 10;
  for (store, guard) in backends(bound).await {
    let store = Arc::new(store);
    let mut tasks = Vec::new();
    for i in 0..40 {
      let store = Arc::clone(&store);
      tasks.push(tokio::spawn(async move { store.append(profile(i)).await }));
    }
    for task in tasks {
      task.await.unwrap().unwrap();
      assert!(store.list(None).await.unwrap().len() <= bound);
    }
    let exported = store.export().await.unwrap();
    assert_eq!(exported.len(), bound, "{}", store.kind());
    let distinct: HashSet<String> = repos(&exported).into_iter().collect();
    assert_eq!(distinct.len(), bound, "{}", store.kind());
    drop(store);
    guard.cleanup().await;
  }
}
