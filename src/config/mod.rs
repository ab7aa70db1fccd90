//! Configuration system for hostop.
//!
//! This module provides TOML configuration loading with hierarchy merging.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded from multiple sources and merged in order:
//!
//! 1. System config: `/etc/hostop/config.toml`
//! 2. User config: `~/.config/hostop/config.toml`
//! 3. Additional config file (via `--config` flag)
//! 4. CLI flags (highest priority)
//!
//! Missing files are skipped; the embedded defaults always apply.
//!
//! ```toml
//! [general]
//! after = "45m"
//! foreground = false
//!
//! [hosts]
//! path = "/etc/hosts"
//! ```

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{Config, DEFAULT_AFTER, GeneralConfig, HostsConfig, Settings};
