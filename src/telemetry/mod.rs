//! Audit logging for hostop.
//!
//! Every hosts file change is logged to syslog with the `HOSTOP` tag.
//!
//! - **Audit logging** (syslog): block written, removal scheduled, block removed
//! - **Debug logging** (tracing): development logs go to stderr via `tracing`
//!
//! When no syslog daemon is reachable (containers, minimal systems) the
//! audit logger falls back to a null logger and hostop keeps working.
//!
//! # Event Format
//!
//! Events are logged as JSON with an ISO8601 timestamp:
//!
//! ```json
//! {"ts":"2026-01-07T14:32:01Z","event":"block_removed","id":"0b6f...","removed":1,"hosts_file":"/etc/hosts"}
//! ```

mod error;
mod events;
mod syslog;

pub use error::TelemetryError;
pub use events::{AuditEvent, ScheduleKind};
pub use syslog::{AuditLogger, SYSLOG_TAG, audit, init_logger, init_null_logger};
