//! Handler-level tests: webhook in, profiles out through every read endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use event_store::{EventStore, FileStore};
use forensic_engine::{AuthMethod, ForensicEngine, PatternCatalog};
use git_monitor::{export, index, ingest, list, request_headers, AppState, ListParams};

const SUSPICIOUS_PUSH: &str = r#"{
  "ref": "refs/heads/main",
  "forced": true,
  "compare": "https://github.com/acme/widgets/compare/abc...def",
  "repository": {"full_name": "acme/widgets"},
  "pusher": {"name": "mallory"},
  "sender": {"login": "mallory", "type": "User"},
  "head_commit": {
    "message": "fix: commit --amend cleanup <script>",
    "added": ["scripts/temp_interactive_push.bat"],
    "modified": []
  }
}"#;

fn state_with(store: EventStore) -> Arc<AppState> {
  Arc::new(AppState {
    engine: ForensicEngine::new(PatternCatalog::default()),
    store,
  })
}

fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
  let mut map = HeaderMap::new();
  for (name, value) in pairs {
    map.insert(*name, HeaderValue::from_static(*value));
  }
  map
}

#[tokio::test]
async fn ingest_assesses_and_stores() {
  let state = state_with(EventStore::volatile());
  let response = ingest(
    State(state.clone()),
    headers(&[("x-forwarded-for", "203.0.113.5")]),
    Bytes::from_static(SUSPICIOUS_PUSH.as_bytes()),
  )
  .await
  .unwrap();
  assert!(response.0.ok);
  assert_eq!(response.0.risk_score, 20);

  let listed = list(State(state.clone()), Query(ListParams::default())).await.unwrap().0;
  assert_eq!(listed.len(), 1);
  let profile = &listed[0];
  assert_eq!(profile.repo.as_deref(), Some("acme/widgets"));
  assert_eq!(profile.ip.as_deref(), Some("203.0.113.5"));
  assert_eq!(profile.auth_method, AuthMethod::PersonalToken("pat-unknown".into()));
}

#[tokio::test]
async fn user_agent_header_drives_auth() {
  let state = state_with(EventStore::volatile());
  let accepted = ingest(
    State(state.clone()),
    headers(&[("user-agent", "GitHub-Hookshot/044aadd")]),
    Bytes::from_static(b"{\"repository\": {\"full_name\": \"acme/web\"}}"),
  )
  .await
  .unwrap();
  assert!(accepted.0.ok);
  let exported = export(State(state)).await.unwrap().0;
  assert_eq!(exported[0].auth_method, AuthMethod::WebUI("web-ui".into()));
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
  let state = state_with(EventStore::volatile());
  let err = ingest(State(state.clone()), HeaderMap::new(), Bytes::from_static(b"not json"))
    .await
    .unwrap_err();
  assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  assert!(export(State(state)).await.unwrap().0.is_empty());
}

#[tokio::test]
async fn json_array_body_is_bad_request() {
  let state = state_with(EventStore::volatile());
  for body in [&b"[]"[..], &b"[{}]"[..]] {
    let err = ingest(State(state.clone()), HeaderMap::new(), Bytes::from_static(body))
      .await
      .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  }
  assert!(export(State(state)).await.unwrap().0.is_empty());
}

#[tokio::test]
async fn store_failure_is_server_error() {
  let dir = tempfile::tempdir().unwrap();
  let blocker = dir.path().join("blocker");
  std::fs::write(&blocker, b"").unwrap();
  let store = EventStore::File(FileStore::open(blocker.join("events.json"), 10).await);

  let state = state_with(store);
  let err = ingest(State(state), HeaderMap::new(), Bytes::from_static(b"{}"))
    .await
    .unwrap_err();
  assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn list_limit_and_export_order() {
  let state = state_with(EventStore::volatile());
  for repo in ["acme/a", "acme/b", "acme/c"] {
    let body = format!(r#"{{"repository": {{"full_name": "{repo}"}}}}"#);
    let accepted = ingest(State(state.clone()), HeaderMap::new(), Bytes::from(body)).await.unwrap();
    assert!(accepted.0.ok);
  }
  let two = list(State(state.clone()), Query(ListParams { limit: Some(2) })).await.unwrap().0;
  let repos: Vec<_> = two.iter().filter_map(|p| p.repo.as_deref()).collect();
  assert_eq!(repos, vec!["acme/c", "acme/b"]);

  let all = export(State(state)).await.unwrap().0;
  assert_eq!(all.len(), 3);
  assert_eq!(all[0].repo.as_deref(), Some("acme/c"));
}

#[tokio::test]
async fn dashboard_escapes_and_highlights() {
  let state = state_with(EventStore::volatile());
  let first = ingest(
    State(state.clone()),
    HeaderMap::new(),
    Bytes::from_static(SUSPICIOUS_PUSH.as_bytes()),
  )
  .await
  .unwrap();
  assert_eq!(first.0.risk_score, 20);
  let second = ingest(
    State(state.clone()),
    HeaderMap::new(),
    Bytes::from_static(br#"{"repository": {"full_name": "acme/<script>alert(1)</script>"}}"#),
  )
  .await
  .unwrap();
  assert!(second.0.ok);
  let html = index(State(state)).await.unwrap().0;
  assert!(html.contains("<tr class=\"high\">"));
  assert!(html.contains("acme/widgets"));
  assert!(html.contains("scripts/temp_interactive_push.bat"));
  assert!(html.contains("Amend: true"));
  assert!(html.contains("FORCE_PUSH"));
  assert!(html.contains("acme/&lt;script&gt;alert(1)&lt;/script&gt;"));
  assert!(!html.contains("<script>"));
}

#[test]
fn request_headers_keep_visible_values() {
  let map = headers(&[("user-agent", "vscode/1.90"), ("x-real-ip", "10.1.2.3")]);
  let converted = request_headers(&map);
  assert_eq!(converted.user_agent(), Some("vscode/1.90"));
  assert_eq!(converted.client_ip(), Some("10.1.2.3"));
}
