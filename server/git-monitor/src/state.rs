//! Shared application state.

use event_store::EventStore;
use forensic_engine::ForensicEngine;

pub struct AppState {
  pub engine: ForensicEngine,
  pub store: EventStore,
}
