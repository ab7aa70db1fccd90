//! Appending hostop blocks to the hosts file.

use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use tracing::{debug, info};

use super::error::HostsError;
use super::lock::LockedFile;
use super::marker::render_block;

/// Permissions for a hosts file created by hostop.
pub const HOSTS_FILE_MODE: u32 = 0o644;

/// Append a block for `id` redirecting every host in `hosts`.
///
/// The file is opened in append mode and created if missing; existing
/// content is never rewritten. The whole block goes out in a single write
/// while holding the advisory lock.
pub fn write_block<S: AsRef<str>>(path: &Path, id: &str, hosts: &[S]) -> Result<(), HostsError> {
    let block = render_block(id, hosts);

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .mode(HOSTS_FILE_MODE)
        .open(path)
        .map_err(|source| HostsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let mut file = LockedFile::acquire(file, path)?;

    file.write_all(block.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| HostsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Appended {} bytes to {:?}", block.len(), file.path());
    info!("Wrote block {} with {} host(s) to {:?}", id, hosts.len(), path);
    Ok(())
}
