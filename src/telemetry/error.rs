//! Errors raised while setting up the audit trail.

use thiserror::Error;

/// Audit trail setup failures.
///
/// None of these stop hostop: `main` falls back to a null logger.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// No syslog daemon accepted the connection.
    #[error("syslog is unavailable: {0}")]
    Unavailable(String),

    /// A global audit logger was already installed.
    #[error("audit logger is already set")]
    AlreadySet,
}
