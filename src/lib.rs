//! hostop: temporarily block hostnames via the hosts file.
//!
//! hostop appends a marked block of `127.0.0.1 <host>` lines to the hosts
//! file and arranges for exactly that block to be removed after a delay,
//! without a daemon and without any state outside the hosts file.
//!
//! # Architecture
//!
//! - **Hosts**: block marker format, append-only writer, idempotent remover
//! - **Schedule**: foreground sleep or detached self-relaunch for removal
//! - **Config**: hierarchical TOML configuration
//! - **Telemetry**: JSON audit events to syslog

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod duration;
pub mod hosts;
pub mod orchestrator;
pub mod schedule;
pub mod telemetry;
