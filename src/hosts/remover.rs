//! Removing hostop blocks from the hosts file.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::error::HostsError;
use super::lock::LockedFile;
use super::marker::{ActiveBlock, match_block, parse_blocks};

/// Remove every block tagged `id` from the hosts file.
///
/// Returns the number of blocks removed. An absent id is not an error:
/// removal is idempotent and leaves the file untouched. The read, rewrite
/// and truncate all happen under one advisory lock, and the file is
/// rewritten in place so its inode (and any bind mount of it) is kept.
/// The file is handled as raw bytes; lines outside the block may use any
/// encoding and come back byte for byte.
pub fn remove_block(path: &Path, id: &str) -> Result<usize, HostsError> {
    let pattern = match_block(id)?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| HostsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let mut file = LockedFile::acquire(file, path)?;

    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|source| HostsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let removed = pattern.find_iter(&content).count();
    if removed == 0 {
        info!("Block {} not present in {:?}, nothing to remove", id, path);
        return Ok(0);
    }
    if removed > 1 {
        warn!("Found {} copies of block {} in {:?}, removing all", removed, id, path);
    }

    let updated = pattern.replace_all(&content, &b""[..]);
    rewrite(&mut file, &updated).map_err(|source| HostsError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Rewrote {:?}: {} -> {} bytes",
        file.path(),
        content.len(),
        updated.len()
    );
    info!("Removed block {} from {:?}", id, path);
    Ok(removed)
}

/// List the hostop blocks currently present in the hosts file.
///
/// A missing file has no blocks.
pub fn list_blocks(path: &Path) -> Result<Vec<ActiveBlock>, HostsError> {
    match std::fs::read(path) {
        Ok(content) => Ok(parse_blocks(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(HostsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace the whole content of a locked file.
fn rewrite(file: &mut LockedFile, content: &[u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(content)?;
    file.flush()?;
    file.sync_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::writer::write_block;
    use std::fs;
    use tempfile::tempdir;

    const BASE: &str = "127.0.0.1 localhost\n::1 localhost ip6-localhost\n";

    #[test]
    fn test_round_trip_restores_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, BASE).unwrap();

        write_block(&path, "rt", &["a.com", "b.com"]).unwrap();
        assert_ne!(fs::read_to_string(&path).unwrap(), BASE);

        assert_eq!(remove_block(&path, "rt").unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), BASE);
    }

    #[test]
    fn test_round_trip_without_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "127.0.0.1 localhost").unwrap();

        write_block(&path, "rt", &["a.com"]).unwrap();
        remove_block(&path, "rt").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "127.0.0.1 localhost");
    }

    #[test]
    fn test_round_trip_with_latin1_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        let base: &[u8] = b"127.0.0.1 localhost\n# caf\xe9 printer\n";
        fs::write(&path, base).unwrap();

        write_block(&path, "x", &["a.com"]).unwrap();
        assert_eq!(list_blocks(&path).unwrap().len(), 1);

        assert_eq!(remove_block(&path, "x").unwrap(), 1);
        assert_eq!(fs::read(&path).unwrap(), base);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, BASE).unwrap();
        write_block(&path, "twice", &["a.com"]).unwrap();

        assert_eq!(remove_block(&path, "twice").unwrap(), 1);
        let after_first = fs::read_to_string(&path).unwrap();

        assert_eq!(remove_block(&path, "twice").unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn test_remove_leaves_other_blocks_intact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, BASE).unwrap();

        write_block(&path, "A", &["a.com"]).unwrap();
        write_block(&path, "B", &["b.com", "c.com"]).unwrap();
        remove_block(&path, "A").unwrap();

        let expected = format!(
            "{BASE}\n###### Hostop Start B\n127.0.0.1 b.com\n127.0.0.1 c.com\n###### Hostop End\n"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_remove_does_not_touch_prefixed_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");

        write_block(&path, "11", &["a.com"]).unwrap();
        write_block(&path, "10", &["b.com"]).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert_eq!(remove_block(&path, "1").unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_remove_all_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, BASE).unwrap();

        write_block(&path, "dup", &["a.com"]).unwrap();
        write_block(&path, "keep", &["k.com"]).unwrap();
        write_block(&path, "dup", &["a.com"]).unwrap();

        assert_eq!(remove_block(&path, "dup").unwrap(), 2);
        let blocks = list_blocks(&path).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "keep");
    }

    #[test]
    fn test_remove_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let err = remove_block(&dir.path().join("absent"), "x").unwrap_err();
        assert!(matches!(err, HostsError::Open { .. }));
    }

    #[test]
    fn test_list_blocks_missing_file() {
        let dir = tempdir().unwrap();
        assert!(list_blocks(&dir.path().join("absent")).unwrap().is_empty());
    }
}
