//! Hostname helpers shared by rule matching and feedback.

use anyhow::{anyhow, Result};
use url::Url;

/// Hostname of `raw` with one leading `www.` removed, lowercased.
pub fn rule_domain(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw).map_err(|err| anyhow!("invalid url '{raw}': {err}"))?;
    let host = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| anyhow!("url '{raw}' has no host"))?
        .to_ascii_lowercase();

    Ok(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// Last two dot-separated labels: `mail.google.com` -> `google.com`.
pub fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Lowercased path of `raw`, or empty when it does not parse.
pub fn url_path(raw: &str) -> String {
    Url::parse(raw)
        .map(|parsed| parsed.path().to_ascii_lowercase())
        .unwrap_or_default()
}
