//! HTML dashboard: one table row per stored push, highlighted by risk band.

use std::fmt::Write;

use forensic_engine::{Finding, RiskBand, RiskProfile};

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Git Forensic Monitor</title>
<style>
  body{font-family:Arial;margin:20px}
  .high{background:#ffcccc}
  .mid{background:#fff0b3}
  table{border-collapse:collapse;width:100%}
  td,th{border:1px solid #ccc;padding:6px;vertical-align:top}
</style>
</head>
<body>
<h2>Git Forensic Monitor</h2>
<table>
<tr><th>Time</th><th>Repo</th><th>Pusher</th><th>Auth Method</th><th>IP</th><th>Risk</th><th>Findings</th></tr>
"#;

const TAIL: &str = "</table>\n</body>\n</html>\n";

pub fn row_class(band: RiskBand) -> &'static str {
  match band {
    RiskBand::High => "high",
    RiskBand::Medium => "mid",
    RiskBand::Low => "",
  }
}

pub fn render(events: &[RiskProfile]) -> String {
  let mut html = String::from(HEAD);
  for e in events {
    render_row(&mut html, e);
  }
  html.push_str(TAIL);
  html
}

fn render_row(html: &mut String, e: &RiskProfile) {
  let flags: Vec<&str> = e.findings.iter().map(|f| f.as_str()).collect();
  // Writing into a String cannot fail.
  let _ = write!(
    html,
    "<tr class=\"{class}\">\
     <td>{time}</td><td>{repo}</td><td>{pusher}</td>\
     <td>{auth}<br/>id: {auth_id}</td>\
     <td>{ip}</td><td>{score}</td>\
     <td>Files: {files}<br/>Text: {text}<br/>Amend: {amend}<br/>Flags: {flags}</td></tr>\n",
    class = row_class(e.band()),
    time = e.time.to_rfc3339(),
    repo = escape(e.repo.as_deref().unwrap_or("")),
    pusher = escape(e.pusher.as_deref().unwrap_or("")),
    auth = escape(e.auth_method.label()),
    auth_id = escape(e.auth_method.id()),
    ip = escape(e.ip.as_deref().unwrap_or("")),
    score = e.risk_score,
    files = escape(&e.suspicious_files().join(",")),
    text = escape(&e.suspicious_text().join(",")),
    amend = e.has(Finding::AmendUsed),
    flags = escape(&flags.join(", ")),
  );
}

/// Minimal HTML escaping for text and double-quoted attribute content.
pub fn escape(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for ch in raw.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
  out
}
