//! Push webhook payload (JSON contract with the hosting service).
//!
//! Every field is optional. A field holding an unexpected JSON type reads as absent,
//! so one odd value never rejects the whole event. Unknown fields are ignored.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One push notification as delivered by the webhook.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushPayload {
  #[serde(default, deserialize_with = "lenient")]
  pub repository: Option<Repository>,
  #[serde(default, deserialize_with = "lenient")]
  pub pusher: Option<Pusher>,
  #[serde(default, deserialize_with = "lenient")]
  pub sender: Option<Sender>,
  #[serde(default, deserialize_with = "lenient")]
  pub installation: Option<Installation>,
  #[serde(default, deserialize_with = "lenient")]
  pub forced: Option<bool>,
  #[serde(default, rename = "ref", deserialize_with = "lenient")]
  pub git_ref: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub compare: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub head_commit: Option<Commit>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Repository {
  #[serde(default, deserialize_with = "lenient")]
  pub full_name: Option<String>,
  #[serde(default, deserialize_with = "lenient_timestamp")]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pusher {
  #[serde(default, deserialize_with = "lenient")]
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sender {
  #[serde(default, deserialize_with = "lenient")]
  pub login: Option<String>,
  #[serde(default, rename = "type", deserialize_with = "lenient")]
  pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Installation {
  /// Numeric or string id; `0`, `""` and `null` read as absent.
  #[serde(default, deserialize_with = "lenient_id")]
  pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Commit {
  #[serde(default, deserialize_with = "lenient")]
  pub id: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub message: Option<String>,
  #[serde(default, deserialize_with = "lenient_timestamp")]
  pub timestamp: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub added: Vec<String>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub modified: Vec<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub author: Option<Author>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Author {
  #[serde(default, deserialize_with = "lenient")]
  pub username: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub name: Option<String>,
}

impl PushPayload {
  /// Parse a raw webhook body. Only a body that is not a JSON object fails.
  pub fn from_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
    match serde_json::from_slice::<Value>(raw)? {
      object @ Value::Object(_) => serde_json::from_value(object),
      other => Err(serde_json::Error::invalid_type(unexpected(&other), &"a JSON object")),
    }
  }

  pub fn repo_name(&self) -> Option<&str> {
    self.repository.as_ref()?.full_name.as_deref()
  }

  pub fn repo_updated_at(&self) -> Option<DateTime<Utc>> {
    self.repository.as_ref()?.updated_at
  }

  pub fn pusher_name(&self) -> Option<&str> {
    self.pusher.as_ref()?.name.as_deref()
  }

  pub fn sender_login(&self) -> Option<&str> {
    self.sender.as_ref()?.login.as_deref()
  }

  pub fn sender_type(&self) -> Option<&str> {
    self.sender.as_ref()?.kind.as_deref()
  }

  pub fn installation_id(&self) -> Option<&str> {
    self.installation.as_ref()?.id.as_deref()
  }

  pub fn is_forced(&self) -> bool {
    self.forced == Some(true)
  }

  /// Commits to assess: `commits` when non-empty, else `head_commit`.
  pub fn commit_list(&self) -> Vec<&Commit> {
    if self.commits.is_empty() {
      self.head_commit.iter().collect()
    } else {
      self.commits.iter().collect()
    }
  }
}

impl Commit {
  pub fn message(&self) -> &str {
    self.message.as_deref().unwrap_or("")
  }

  /// Author identity, preferring the username over the display name.
  pub fn author_identity(&self) -> Option<&str> {
    let author = self.author.as_ref()?;
    author
      .username
      .as_deref()
      .filter(|u| !u.is_empty())
      .or_else(|| author.name.as_deref().filter(|n| !n.is_empty()))
  }

  /// Added then modified paths.
  pub fn changed_files(&self) -> impl Iterator<Item = &str> {
    self.added.iter().chain(self.modified.iter()).map(String::as_str)
  }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
  match value {
    Value::Null => Unexpected::Unit,
    Value::Bool(b) => Unexpected::Bool(*b),
    Value::Number(_) => Unexpected::Other("number"),
    Value::String(s) => Unexpected::Str(s),
    Value::Array(_) => Unexpected::Seq,
    Value::Object(_) => Unexpected::Map,
  }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

/// Arrays keep their well-formed elements; anything else reads as empty.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  match Value::deserialize(deserializer)? {
    Value::Array(items) => Ok(
      items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect(),
    ),
    _ => Ok(Vec::new()),
  }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
    Value::String(s) if !s.is_empty() => Some(s),
    _ => None,
  })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(parse_timestamp(&Value::deserialize(deserializer)?))
}

/// RFC 3339 string or integer epoch seconds; anything else is not a timestamp.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
  match value {
    Value::String(s) => DateTime::parse_from_rfc3339(s)
      .ok()
      .map(|dt| dt.with_timezone(&Utc)),
    Value::Number(n) => Utc.timestamp_opt(n.as_i64()?, 0).single(),
    _ => None,
  }
}
