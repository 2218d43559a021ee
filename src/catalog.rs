//! File-based remote catalog source.
//!
//! A catalog is a JSON array of [`RemoteEntry`] objects, typically written by
//! whatever polls the channel's feed.

use anyhow::{Context, Result};
use std::path::Path;
use tubevault_common::RemoteEntry;

/// Parse catalog entries from JSON text.
pub fn parse_entries(json: &str) -> Result<Vec<RemoteEntry>> {
    serde_json::from_str(json).context("Failed to parse catalog entries")
}

/// Load catalog entries from a JSON file.
pub fn load_entries(path: &Path) -> Result<Vec<RemoteEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
    parse_entries(&content).with_context(|| format!("Invalid catalog file: {:?}", path))
}

/// Async variant of [`load_entries`].
pub async fn read_entries(path: &Path) -> Result<Vec<RemoteEntry>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
    parse_entries(&content).with_context(|| format!("Invalid catalog file: {:?}", path))
}
