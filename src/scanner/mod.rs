//! Local archive scanner.
//!
//! Walks a channel directory, identifies every supported video by its
//! filename and reports what was skipped along the way.

pub mod identifier;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tubevault_common::Video;
use walkdir::WalkDir;

pub use identifier::{Identification, VideoIdentifier};

/// Result of scanning one directory.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    /// Identified videos, ordered by path.
    pub videos: Vec<Video>,
    /// Files that are not a supported container.
    pub skipped_unsupported: usize,
    /// Supported containers whose name carries no id.
    pub skipped_unidentified: usize,
    /// Entries the walk could not read.
    pub walk_errors: usize,
}

/// Scanner for discovering archived videos.
#[derive(Debug, Clone)]
pub struct Scanner {
    follow_links: bool,
    max_depth: Option<usize>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create a scanner that follows symlinks and recurses without limit.
    pub fn new() -> Self {
        Self {
            follow_links: true,
            max_depth: None,
        }
    }

    /// Limit how deep below the root the walk descends.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan a directory on the blocking thread pool.
    pub async fn scan_directory(&self, dir: &Path) -> Result<ScanReport> {
        let scanner = self.clone();
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || scanner.scan_directory_blocking(&dir))
            .await
            .context("scan task panicked")?
    }

    /// Scan a directory for videos.
    pub fn scan_directory_blocking(&self, dir: &Path) -> Result<ScanReport> {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {:?}", dir);
        }

        info!("Scanning directory: {:?}", dir);
        let identifier = VideoIdentifier::new();
        let mut report = ScanReport {
            root: dir.to_path_buf(),
            ..Default::default()
        };

        let mut walker = WalkDir::new(dir)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    report.walk_errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match identifier.identify(entry.path()) {
                Identification::Video(video) => {
                    debug!(id = %video.id(), path = ?video.path(), "found video");
                    report.videos.push(video);
                }
                Identification::NotVideo => report.skipped_unsupported += 1,
                Identification::Unidentified(e) => {
                    warn!("Skipping {:?}: {}", entry.path(), e);
                    report.skipped_unidentified += 1;
                }
            }
        }

        report.videos.sort_by(|a, b| a.path().cmp(b.path()));

        info!(
            videos = report.videos.len(),
            unsupported = report.skipped_unsupported,
            unidentified = report.skipped_unidentified,
            "Scan of {:?} complete",
            dir
        );

        Ok(report)
    }
}
