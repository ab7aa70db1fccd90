//! Advisory locking on the hosts file.
//!
//! Writers and removers hold an exclusive `flock` on the hosts file itself
//! for the duration of their I/O. The remover rewrites the file in place,
//! so the locked inode stays the live file.

use std::fs::File;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{trace, warn};

use super::error::HostsError;

/// An open hosts file holding an exclusive advisory lock.
///
/// The lock is released when the guard is dropped.
pub struct LockedFile {
    file: File,
    path: PathBuf,
}

impl LockedFile {
    /// Block until an exclusive lock on `file` is acquired.
    pub fn acquire(file: File, path: &Path) -> Result<Self, HostsError> {
        file.lock_exclusive().map_err(|source| HostsError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        trace!("Locked {:?}", path);

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the locked file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for LockedFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

impl DerefMut for LockedFile {
    fn deref_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            // Closing the descriptor releases the lock anyway
            warn!("Failed to unlock {:?}: {}", self.path, e);
        } else {
            trace!("Unlocked {:?}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "").unwrap();

        {
            let file = OpenOptions::new().append(true).open(&path).unwrap();
            let mut locked = LockedFile::acquire(file, &path).unwrap();
            locked.write_all(b"x").unwrap();
            assert_eq!(locked.path(), path.as_path());
        }

        // A second handle can take the lock without blocking once the guard is gone
        let other = OpenOptions::new().read(true).open(&path).unwrap();
        assert!(other.try_lock_exclusive().is_ok());
    }
}
