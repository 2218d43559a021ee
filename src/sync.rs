//! Per-channel planning: scan, load the catalog, reconcile.
//!
//! Channels are planned concurrently with a bounded task group. Every
//! channel yields its own outcome, so one broken channel never hides the
//! results of the others.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use tubevault_common::RemoteEntry;

use crate::catalog;
use crate::config::{ChannelConfig, Config};
use crate::fanout;
use crate::reconcile;
use crate::scanner::Scanner;

/// Work list for one channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelPlan {
    pub channel: String,
    pub directory: PathBuf,
    /// Videos held locally.
    pub local: usize,
    /// Entries listed in the catalog.
    pub remote: usize,
    /// Catalog entries not yet archived, in catalog order.
    pub to_fetch: Vec<RemoteEntry>,
}

/// Outcome of planning one channel.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: String,
    pub result: Result<ChannelPlan>,
}

/// Plan a single channel.
pub async fn plan_channel(config: &Config, channel: &ChannelConfig) -> Result<ChannelPlan> {
    let directory = config.channel_dir(channel);
    let report = Scanner::new()
        .scan_directory(&directory)
        .await
        .with_context(|| format!("Failed to scan channel '{}'", channel.name))?;

    let entries = catalog::read_entries(&config.catalog_path(channel))
        .await
        .with_context(|| format!("Failed to load catalog for channel '{}'", channel.name))?;
    let remote = entries.len();

    let to_fetch = reconcile::entries_to_fetch(entries, &report.videos);
    info!(
        channel = %channel.name,
        local = report.videos.len(),
        remote,
        to_fetch = to_fetch.len(),
        "Planned channel"
    );

    Ok(ChannelPlan {
        channel: channel.name.clone(),
        directory,
        local: report.videos.len(),
        remote,
        to_fetch,
    })
}

/// Plan every configured channel, at most `concurrency.channels` at once.
///
/// Outcomes are returned in configuration order, one per channel. A planning
/// task that panics is reported as that channel's error.
pub async fn plan_channels(config: Arc<Config>) -> Vec<ChannelOutcome> {
    let channels = config.channels.clone();
    let limit = config.concurrency.channels;
    let names: Vec<String> = channels.iter().map(|c| c.name.clone()).collect();

    let joined = fanout::bounded(channels, limit, move |channel| {
        let config = config.clone();
        async move { plan_channel(&config, &channel).await }
    })
    .await;

    names
        .into_iter()
        .zip(joined)
        .map(|(channel, result)| {
            let result = result.unwrap_or_else(|e| {
                warn!("Planning task for channel '{}' failed: {}", channel, e);
                Err(anyhow::Error::new(e).context("channel planning task failed"))
            });
            ChannelOutcome { channel, result }
        })
        .collect()
}
