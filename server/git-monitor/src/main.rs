//! Binary entrypoint for the git forensic monitor.

use std::sync::Arc;

use event_store::EventStore;
use forensic_engine::{ForensicEngine, PatternCatalog};
use git_monitor::{AppState, Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .init();

  let config = Config::from_env()?;

  let catalog = PatternCatalog::default().with_extra(config.extra_patterns.iter().cloned());
  info!(patterns = catalog.len(), "signature catalog loaded");
  let engine = ForensicEngine::new(catalog);

  // Keep assessing even when durable storage is down.
  let store = match EventStore::open(&config.store).await {
    Ok(store) => store,
    Err(e) => {
      warn!(error = %e, store = %config.store.describe(), "store unavailable, falling back to memory");
      EventStore::volatile()
    }
  };

  let state = Arc::new(AppState { engine, store });
  let app = git_monitor::router(state);

  let addr = config.addr();
  info!(%addr, "git-monitor listening");
  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
