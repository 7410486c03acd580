//! Git Forensic Monitor: Forensic Risk Engine. Rule-based; no DB, no network.
//!
//! Takes one push webhook payload plus request headers and produces a [`RiskProfile`]:
//! how the pusher authenticated, which forensic heuristics fired, which catalog
//! signatures matched, and an additive risk score.

pub mod auth;
pub mod catalog;
pub mod engine;
pub mod forensic;
pub mod headers;
pub mod payload;
pub mod score;
pub mod types;

pub use catalog::{PatternCatalog, DEFAULT_PATTERNS};
pub use engine::ForensicEngine;
pub use headers::RequestHeaders;
pub use payload::PushPayload;
pub use types::{AuthMethod, Finding, Findings, HitLocation, PatternHit, RiskBand, RiskProfile};
