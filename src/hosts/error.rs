//! Error types for hosts file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or removing hostop blocks.
#[derive(Debug, Error)]
pub enum HostsError {
    /// Failed to open the hosts file.
    #[error("Failed to open hosts file {path}: {source}")]
    Open {
        /// Path to the hosts file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the hosts file.
    #[error("Failed to read hosts file {path}: {source}")]
    Read {
        /// Path to the hosts file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the hosts file.
    #[error("Failed to write hosts file {path}: {source}")]
    Write {
        /// Path to the hosts file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to take the advisory lock on the hosts file.
    #[error("Failed to lock hosts file {path}: {source}")]
    Lock {
        /// Path to the hosts file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The block pattern for an identifier could not be compiled.
    #[error("Invalid block pattern for id '{id}': {source}")]
    Pattern {
        /// Identifier the pattern was built for.
        id: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display() {
        let err = HostsError::Write {
            path: PathBuf::from("/etc/hosts"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/hosts"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_lock_error_display() {
        let err = HostsError::Lock {
            path: PathBuf::from("/tmp/hosts"),
            source: std::io::Error::other("busy"),
        };
        assert!(err.to_string().starts_with("Failed to lock hosts file /tmp/hosts"));
    }
}
