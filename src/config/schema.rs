//! Configuration schema definitions.
//!
//! Configuration is loaded from multiple sources and merged in order:
//!
//! 1. Embedded defaults (`config/default.toml`)
//! 2. System config: `/etc/hostop/config.toml`
//! 3. User config: `~/.config/hostop/config.toml`
//! 4. Additional config file (via `--config` flag)
//! 5. CLI flags (highest priority)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigError;
use crate::cli::Cli;
use crate::duration::parse_duration;

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Hosts file settings.
    #[serde(default)]
    pub hosts: HostsConfig,
}

impl Config {
    /// Parse the embedded default configuration.
    pub fn embedded() -> Result<Self, ConfigError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<embedded:default.toml>"),
            source: e,
        })
    }

    /// Merge another config into this one.
    ///
    /// Values set in `other` override values in `self`.
    pub fn merge(&mut self, other: Config) {
        self.general.merge(other.general);
        self.hosts.merge(other.hosts);
    }

    /// Combine this config with CLI flags into the settings for one run.
    pub fn resolve(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let after = match cli.after {
            Some(after) => after,
            None => match self.general.after.as_deref() {
                Some(after) => {
                    parse_duration(after).map_err(|source| ConfigError::InvalidDuration {
                        field: "general.after".to_string(),
                        source,
                    })?
                }
                None => DEFAULT_AFTER,
            },
        };

        let hosts_file = match (&cli.hosts_file, &self.hosts.path) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => path.clone(),
            (None, None) => PathBuf::from(crate::hosts::DEFAULT_HOSTS_FILE),
        };
        if hosts_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hosts.path".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(Settings {
            after,
            foreground: cli.foreground || self.general.foreground.unwrap_or(false),
            hosts_file,
            verbose: cli.verbose,
        })
    }
}

/// Default delay before a block is removed.
pub const DEFAULT_AFTER: Duration = Duration::from_secs(3600);

/// General application settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeneralConfig {
    /// Default delay before removal, e.g. `"1h"` or `"45m"`.
    #[serde(default)]
    pub after: Option<String>,

    /// Sleep in the blocking process instead of relaunching detached.
    #[serde(default)]
    pub foreground: Option<bool>,
}

impl GeneralConfig {
    fn merge(&mut self, other: GeneralConfig) {
        if other.after.is_some() {
            self.after = other.after;
        }
        if other.foreground.is_some() {
            self.foreground = other.foreground;
        }
    }
}

/// Hosts file settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostsConfig {
    /// Path of the hosts file to edit.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl HostsConfig {
    fn merge(&mut self, other: HostsConfig) {
        if other.path.is_some() {
            self.path = other.path;
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Delay before the block is removed.
    pub after: Duration,
    /// Wait in-process rather than in a detached relaunch.
    pub foreground: bool,
    /// Hosts file to edit.
    pub hosts_file: PathBuf,
    /// Verbosity forwarded to a relaunched process.
    pub verbose: u8,
}
