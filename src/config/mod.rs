mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./tubevault.toml",
        "./config.toml",
        "~/.config/tubevault/config.toml",
        "/etc/tubevault/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

fn expand_paths(config: &mut Config) {
    config.archive.root = expand_tilde(&config.archive.root);
    for channel in &mut config.channels {
        channel.path = expand_tilde(&channel.path);
        channel.catalog = expand_tilde(&channel.catalog);
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.concurrency.channels == 0 {
        anyhow::bail!("concurrency.channels must be greater than 0");
    }
    if config.concurrency.extractions == 0 {
        anyhow::bail!("concurrency.extractions must be greater than 0");
    }
    if config.tools.timeout_secs == 0 {
        anyhow::bail!("tools.timeout_secs must be greater than 0");
    }

    if !config.archive.root.exists() {
        tracing::warn!("Archive root does not exist: {:?}", config.archive.root);
    }

    let mut seen = HashSet::new();
    for channel in &config.channels {
        if channel.name.trim().is_empty() {
            anyhow::bail!("Channel with path {:?} has an empty name", channel.path);
        }
        if !seen.insert(channel.name.as_str()) {
            anyhow::bail!("Channel '{}' is configured more than once", channel.name);
        }

        let dir = config.channel_dir(channel);
        if !dir.exists() {
            tracing::warn!("Channel '{}' directory does not exist: {:?}", channel.name, dir);
        }
    }

    Ok(())
}
