//! Request headers handed over by the transport layer.

use std::collections::BTreeMap;

/// Header map with case-insensitive names. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders(BTreeMap<String, String>);

impl RequestHeaders {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: &str, value: impl Into<String>) {
    self.0.insert(name.to_ascii_lowercase(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
  }

  pub fn user_agent(&self) -> Option<&str> {
    self.get("user-agent")
  }

  /// Client address as reported by the proxy chain.
  pub fn client_ip(&self) -> Option<&str> {
    ["x-forwarded-for", "x-real-ip"]
      .iter()
      .filter_map(|name| self.get(name))
      .map(str::trim)
      .find(|v| !v.is_empty())
  }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RequestHeaders {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut headers = Self::new();
    for (name, value) in iter {
      headers.insert(name.as_ref(), value);
    }
    headers
  }
}
