//! HEAD: the pointer to the most recent commit.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Result;
use crate::infra::{read_file, write_file_atomic};
use crate::objects::Digest;

/// The persisted HEAD scalar (`.ledgit/HEAD`).
///
/// The file holds either nothing (no commits yet) or the hex digest of the
/// latest commit. Writes overwrite it; the last writer wins.
#[derive(Debug, Clone)]
pub struct HeadFile {
    path: PathBuf,
}

impl HeadFile {
    /// Creates a handle for the HEAD file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        HeadFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path of the HEAD file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads HEAD.
    ///
    /// "No commits yet" is a normal state, not an error: a missing, empty,
    /// unreadable or malformed HEAD file all read as `None`.
    pub fn read(&self) -> Option<Digest> {
        let data = match read_file(&self.path) {
            Ok(data) => data,
            Err(e) => {
                if !e.is_not_found() {
                    warn!("cannot read {}: {}", self.path.display(), e);
                }
                return None;
            }
        };

        let text = String::from_utf8_lossy(&data);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match Digest::from_hex(text) {
            Ok(digest) => Some(digest),
            Err(e) => {
                warn!("ignoring malformed HEAD: {}", e);
                None
            }
        }
    }

    /// Points HEAD at `digest`.
    pub fn write(&self, digest: &Digest) -> Result<()> {
        write_file_atomic(&self.path, digest.to_hex().as_bytes())?;
        debug!("HEAD -> {}", digest.short());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEST_DIGEST: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn test_missing_head_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(HeadFile::new(temp.path().join("HEAD")).read().is_none());
    }

    #[test]
    fn test_empty_head_is_none() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("HEAD"), "").unwrap();
        assert!(HeadFile::new(temp.path().join("HEAD")).read().is_none());
    }

    #[test]
    fn test_malformed_head_is_none() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();
        assert!(HeadFile::new(temp.path().join("HEAD")).read().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let head = HeadFile::new(temp.path().join("HEAD"));
        let digest = Digest::from_hex(TEST_DIGEST).unwrap();

        head.write(&digest).unwrap();
        assert_eq!(head.read(), Some(digest));
        assert_eq!(fs::read_to_string(head.path()).unwrap(), TEST_DIGEST);
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("HEAD"), format!("{}\n", TEST_DIGEST)).unwrap();
        let head = HeadFile::new(temp.path().join("HEAD"));
        assert_eq!(head.read().unwrap().to_hex(), TEST_DIGEST);
    }
}
