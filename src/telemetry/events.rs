//! Audit event types for structured logging.
//!
//! These events are logged to syslog with the `HOSTOP` tag so every change
//! to the hosts file leaves a trail, including changes made by detached
//! removal processes whose stderr goes nowhere.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Audit events for hosts file changes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A block was appended to the hosts file.
    BlockWritten {
        /// Block identifier.
        id: String,
        /// Hostnames redirected by the block.
        hosts: Vec<String>,
        /// Hosts file that was edited.
        hosts_file: String,
        /// Seconds until the block is removed.
        after_sec: u64,
    },

    /// Removal of a block was committed.
    RemovalScheduled {
        /// Block identifier.
        id: String,
        /// How the removal will run.
        mode: ScheduleKind,
        /// PID of the detached removal process, if any.
        pid: Option<u32>,
    },

    /// Removal of a block ran.
    BlockRemoved {
        /// Block identifier.
        id: String,
        /// Number of blocks removed (0 when already gone).
        removed: usize,
        /// Hosts file that was edited.
        hosts_file: String,
    },

    /// The detached removal process could not be started.
    RemovalLaunchFailed {
        /// Identifier of the block left in place.
        id: String,
        /// Launch error.
        error: String,
    },
}

/// How a removal is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// The blocking process sleeps, then removes.
    Foreground,
    /// A detached relaunch sleeps, then removes.
    Detached,
}

/// Wrapper for serializing events with timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampedEvent<'a> {
    /// ISO8601 timestamp.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// The actual event (flattened into this struct).
    #[serde(flatten)]
    pub event: &'a AuditEvent,
}

impl AuditEvent {
    /// Wrap this event with a timestamp for serialization.
    pub fn with_timestamp(&self) -> TimestampedEvent<'_> {
        TimestampedEvent {
            timestamp: Utc::now(),
            event: self,
        }
    }
}
