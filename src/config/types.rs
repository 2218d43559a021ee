use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use tubevault_av::ToolsConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl Config {
    /// Directory holding a channel's downloaded videos.
    pub fn channel_dir(&self, channel: &ChannelConfig) -> PathBuf {
        self.archive.root.join(&channel.path)
    }

    /// Location of a channel's catalog file.
    pub fn catalog_path(&self, channel: &ChannelConfig) -> PathBuf {
        self.archive.root.join(&channel.catalog)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    /// Root directory of the archive; channel paths are relative to it
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConcurrencyConfig {
    /// Channels planned at the same time
    #[serde(default = "default_concurrency")]
    pub channels: usize,

    /// Metadata extractions running at the same time
    #[serde(default = "default_concurrency")]
    pub extractions: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            channels: default_concurrency(),
            extractions: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

/// One archived channel.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelConfig {
    pub name: String,

    /// Video directory, relative to `archive.root` unless absolute
    pub path: PathBuf,

    /// JSON catalog of remote entries, relative to `archive.root` unless absolute
    pub catalog: PathBuf,
}
