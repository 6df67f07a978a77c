use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Decode JSON printed by a tool on stdout.
pub fn parse_stdout<T: DeserializeOwned>(tool: &str, bytes: &[u8]) -> Result<T> {
    let raw = std::str::from_utf8(bytes).with_context(|| format!("{tool} emitted non-UTF-8 output"))?;
    let trimmed = raw.trim();
    anyhow::ensure!(!trimmed.is_empty(), "{tool} did not emit JSON on stdout");
    serde_json::from_str(trimmed).with_context(|| format!("failed to parse JSON from {tool}"))
}
