//! Path resolution for the overlay config file
//!
//! # Environment Variables
//!
//! - `TERRACONF_CONFIG` - Explicit config file (handled by the CLI, same as `--config`)
//! - `TERRACONF_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! 1. `--config` / `TERRACONF_CONFIG` (must exist)
//! 2. `TERRACONF_CONFIG_DIR/config.toml`
//! 3. `XDG_CONFIG_HOME/terraconf/config.toml` (if set)
//! 4. `~/.config/terraconf/config.toml`
//!
//! Files found through 2-4 are optional.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "TERRACONF_CONFIG_DIR";

/// File name looked up inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the overlay config comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named by the user; a missing file is an error
    Explicit(PathBuf),
    /// Looked up in the config directory; a missing file means no overlay
    Discovered(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => path,
        }
    }
}

/// Resolve the config file location from the environment.
pub fn config_file(explicit: Option<&str>) -> Result<ConfigLocation> {
    resolve_config_file(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
}

fn resolve_config_file(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> Result<ConfigLocation> {
    if let Some(path) = explicit {
        let path = expand(path);
        log::debug!("Using explicit config file: {}", path.display());
        return Ok(ConfigLocation::Explicit(path));
    }

    if let Some(dir) = env(ENV_CONFIG_DIR) {
        let path = expand(&dir).join(CONFIG_FILE_NAME);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(ConfigLocation::Discovered(path));
    }

    if let Some(xdg_config) = env("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config)
            .join("terraconf")
            .join(CONFIG_FILE_NAME);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(ConfigLocation::Discovered(path));
    }

    let home = home.context("Could not determine home directory")?;
    let path = home
        .join(".config")
        .join("terraconf")
        .join(CONFIG_FILE_NAME);
    log::debug!("Using default config file: {}", path.display());
    Ok(ConfigLocation::Discovered(path))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
