//! Authentication-method classification from payload identity fields and User-Agent.

use crate::headers::RequestHeaders;
use crate::payload::PushPayload;
use crate::types::AuthMethod;

const OAUTH_AGENT_MARKERS: [&str; 3] = ["Visual-Studio", "vscode", "GitCredential"];

/// Classify how a push was authenticated. First matching rule wins; never fails.
pub fn classify(payload: &PushPayload, headers: &RequestHeaders) -> AuthMethod {
  if let Some(id) = payload.installation_id() {
    return AuthMethod::GitHubApp(id.to_string());
  }
  if payload
    .sender_login()
    .is_some_and(|login| login.contains("github-actions"))
  {
    return AuthMethod::GitHubActions("GITHUB_TOKEN".into());
  }
  if payload.pusher_name() == Some("deploy key") {
    return AuthMethod::DeployKey("ssh-key".into());
  }

  let agent = headers.user_agent().unwrap_or("");
  if agent.contains("GitHub-Hookshot") {
    return AuthMethod::WebUI("web-ui".into());
  }
  if OAUTH_AGENT_MARKERS.iter().any(|m| agent.contains(m)) {
    return AuthMethod::OAuthClient("oauth".into());
  }

  AuthMethod::PersonalToken("pat-unknown".into())
}
