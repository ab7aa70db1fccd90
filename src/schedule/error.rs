//! Scheduler error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::hosts::HostsError;

/// Errors that can occur while arming or running a removal.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The detached removal process could not be started.
    ///
    /// The block stays in the hosts file until removed by hand.
    #[error("Failed to launch removal process {program}: {source}")]
    LaunchFailed {
        /// Program that was launched.
        program: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The path of the running executable could not be determined.
    #[error("Could not determine the hostop executable path")]
    NoExecutable,

    /// The in-process removal failed.
    #[error("Removal failed: {0}")]
    Removal(#[from] HostsError),
}
