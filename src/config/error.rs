//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::duration::ParseDurationError;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML parse error.
        source: toml::de::Error,
    },

    /// A configured duration is malformed.
    #[error("Invalid duration for {field}: {source}")]
    InvalidDuration {
        /// The field holding the duration.
        field: String,
        /// The underlying parse error.
        source: ParseDurationError,
    },

    /// A configuration value is invalid.
    #[error("Invalid config value for {field}: {message}")]
    InvalidValue {
        /// The field name that has an invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Block mode was selected without any hostnames.
    #[error("No hosts to block (pass one or more hostnames, or --reset <ID>)")]
    NoHosts,
}
