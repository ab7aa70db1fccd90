//! Syslog sink for audit events.
//!
//! Events are sent as one JSON line each under the `HOSTOP` tag, facility
//! `user`. A detached removal process has no terminal, so this is the only
//! place its work shows up.

use std::sync::{Mutex, OnceLock};

use syslog::{Facility, Formatter3164, Logger, LoggerBackend};
use tracing::{debug, error};

use super::error::TelemetryError;
use super::events::AuditEvent;

/// Syslog tag for all audit events.
pub const SYSLOG_TAG: &str = "HOSTOP";

type SyslogWriter = Logger<LoggerBackend, Formatter3164>;

static AUDIT_LOGGER: OnceLock<AuditLogger> = OnceLock::new();

/// Stands in until `init_logger` or `init_null_logger` runs.
static NULL_LOGGER: AuditLogger = AuditLogger::new_null();

/// Writes audit events to syslog, or drops them when there is no syslog.
pub struct AuditLogger {
    sink: Option<Mutex<SyslogWriter>>,
}

impl AuditLogger {
    /// Connect to the local syslog daemon over its Unix socket.
    pub fn new() -> Result<Self, TelemetryError> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: SYSLOG_TAG.to_string(),
            pid: std::process::id(),
        };

        let writer =
            syslog::unix(formatter).map_err(|e| TelemetryError::Unavailable(e.to_string()))?;
        debug!("Audit events go to syslog as '{}'", SYSLOG_TAG);

        Ok(Self {
            sink: Some(Mutex::new(writer)),
        })
    }

    /// A logger that only traces events at debug level.
    pub const fn new_null() -> Self {
        Self { sink: None }
    }

    /// Record one event, stamped with the current time.
    ///
    /// Failures are traced and otherwise ignored; auditing never fails a
    /// hosts file change.
    pub fn log(&self, event: AuditEvent) {
        let line = match serde_json::to_string(&event.with_timestamp()) {
            Ok(line) => line,
            Err(e) => {
                error!("Cannot encode audit event {:?}: {}", event, e);
                return;
            }
        };

        match self.sink {
            Some(ref sink) => Self::send(sink, &line),
            None => debug!("audit (no syslog): {}", line),
        }
    }

    fn send(sink: &Mutex<SyslogWriter>, line: &str) {
        let Ok(mut writer) = sink.lock() else {
            error!("Syslog writer lock poisoned, dropping audit event");
            return;
        };
        match writer.info(line) {
            Ok(()) => debug!("audit: {}", line),
            Err(e) => error!("Failed to write audit event to syslog: {}", e),
        }
    }

    /// Whether events are being dropped.
    pub fn is_null(&self) -> bool {
        self.sink.is_none()
    }
}

/// Install the syslog-backed global audit logger.
pub fn init_logger() -> Result<(), TelemetryError> {
    install(AuditLogger::new()?)
}

/// Install a global audit logger that drops events.
pub fn init_null_logger() -> Result<(), TelemetryError> {
    install(AuditLogger::new_null())
}

fn install(logger: AuditLogger) -> Result<(), TelemetryError> {
    AUDIT_LOGGER
        .set(logger)
        .map_err(|_| TelemetryError::AlreadySet)
}

/// The global audit logger; a null logger until one is installed.
pub fn audit() -> &'static AuditLogger {
    AUDIT_LOGGER.get().unwrap_or(&NULL_LOGGER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_audit_is_null() {
        // Unit tests never install a global logger
        assert!(audit().is_null());
    }

    #[test]
    fn test_null_logger_drops_events() {
        let logger = AuditLogger::new_null();
        assert!(logger.is_null());

        logger.log(AuditEvent::BlockRemoved {
            id: "x".to_string(),
            removed: 0,
            hosts_file: "/tmp/hosts".to_string(),
        });
    }

    #[test]
    #[ignore = "Requires running syslog daemon"]
    fn test_connects_to_syslog() {
        let logger = AuditLogger::new().unwrap();
        assert!(!logger.is_null());
    }
}
