//! Service configuration from environment variables, with defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use event_store::{StoreConfig, DEFAULT_TABLE};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_EVENTS_FILE: &str = "data/events.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("{var}: invalid value {value:?}: {reason}")]
  Invalid {
    var: String,
    value: String,
    reason: String,
  },

  #[error("{0} must be set")]
  Missing(String),
}

impl ConfigError {
  fn invalid(var: &str, value: &str, reason: &str) -> Self {
    Self::Invalid {
      var: var.to_string(),
      value: value.to_string(),
      reason: reason.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// `HOST`, loopback by default (put a proxy in front for public webhooks).
  pub host: IpAddr,
  /// `PORT`.
  pub port: u16,
  /// `STORE_BACKEND` = memory | file | postgres, plus `EVENTS_FILE`, `DATABASE_URL`,
  /// `EVENTS_TABLE` and `STORE_RETENTION`.
  pub store: StoreConfig,
  /// `EXTRA_PATTERNS`, comma-separated additions to the signature catalog.
  pub extra_patterns: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      host: IpAddr::V4(Ipv4Addr::LOCALHOST),
      port: DEFAULT_PORT,
      store: StoreConfig::default(),
      extra_patterns: Vec::new(),
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from any key lookup; empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let mut config = Config::default();

    if let Some(host) = get("HOST") {
      config.host = host
        .parse()
        .map_err(|_| ConfigError::invalid("HOST", &host, "expected an IP address"))?;
    }
    if let Some(port) = get("PORT") {
      config.port = port
        .parse()
        .map_err(|_| ConfigError::invalid("PORT", &port, "expected a valid u16"))?;
    }

    let backend = get("STORE_BACKEND").unwrap_or_else(|| "memory".into());
    config.store = match backend.to_ascii_lowercase().as_str() {
      "memory" | "volatile" => StoreConfig::volatile(),
      "file" => StoreConfig::file(PathBuf::from(
        get("EVENTS_FILE").unwrap_or_else(|| DEFAULT_EVENTS_FILE.into()),
      )),
      "postgres" | "log" => StoreConfig::Postgres {
        database_url: get("DATABASE_URL").ok_or_else(|| ConfigError::Missing("DATABASE_URL".into()))?,
        table: get("EVENTS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.into()),
        retention: None,
      },
      _ => {
        return Err(ConfigError::invalid(
          "STORE_BACKEND",
          &backend,
          "expected memory, file or postgres",
        ))
      }
    };

    if let Some(raw) = get("STORE_RETENTION") {
      let retention: usize = raw
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::invalid("STORE_RETENTION", &raw, "expected a positive integer"))?;
      config.store = config.store.with_retention(retention);
    }

    if let Some(raw) = get("EXTRA_PATTERNS") {
      config.extra_patterns = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    }

    Ok(config)
  }

  pub fn addr(&self) -> SocketAddr {
    SocketAddr::new(self.host, self.port)
  }
}
