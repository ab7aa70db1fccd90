//! Reading and layering hostop config files.
//!
//! The embedded defaults are overlaid with `/etc/hostop/config.toml`, then
//! the user's `hostop/config.toml` under the XDG config dir, then any file
//! named with `--config`. Later layers win per key. CLI flags are applied
//! afterwards by [`Config::resolve`](super::Config::resolve).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ConfigError;
use super::schema::Config;
use crate::cli::Cli;

/// System-wide configuration path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hostop/config.toml";

/// Directory under the user config dir holding hostop's config.
pub const USER_CONFIG_DIR: &str = "hostop";

/// File name of the user config.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Finds, parses and layers config files.
pub struct ConfigLoader {
    system_path: PathBuf,
    user_path: PathBuf,
}

impl ConfigLoader {
    /// Loader for the standard system and user locations.
    #[must_use]
    pub fn new() -> Self {
        let user_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(USER_CONFIG_DIR);

        Self::with_paths(PathBuf::from(SYSTEM_CONFIG_PATH), user_dir.join(USER_CONFIG_FILE))
    }

    /// Loader reading the system and user layers from the given paths.
    #[must_use]
    pub fn with_paths(system_path: PathBuf, user_path: PathBuf) -> Self {
        Self {
            system_path,
            user_path,
        }
    }

    /// Build the merged config for one invocation.
    ///
    /// The system and user layers are optional. A `--config` file must
    /// exist. A layer that exists but is not valid TOML is an error.
    pub fn load(&self, cli: &Cli) -> Result<Config, ConfigError> {
        let mut config = Config::embedded()?;

        for (layer, path) in [("system", &self.system_path), ("user", &self.user_path)] {
            match read_layer(path)? {
                Some(overlay) => {
                    debug!("Applied {} config {:?}", layer, path);
                    config.merge(overlay);
                }
                None => debug!("No {} config at {:?}", layer, path),
            }
        }

        if let Some(ref path) = cli.config {
            let overlay = read_layer(path)?.ok_or_else(|| ConfigError::ReadError {
                path: path.clone(),
                source: std::io::Error::new(
                    ErrorKind::NotFound,
                    "config file given with --config does not exist",
                ),
            })?;
            debug!("Applied --config {:?}", path);
            config.merge(overlay);
        }

        Ok(config)
    }
}

/// Parse one config layer; `None` when the file does not exist.
fn read_layer(path: &Path) -> Result<Option<Config>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
