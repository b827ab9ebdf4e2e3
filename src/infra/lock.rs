//! Advisory repository lock.
//!
//! Mutating commands read, modify and rewrite whole files (the index, HEAD).
//! Two processes doing that at once lose updates, so each mutation holds an
//! exclusive `flock`-style lock on `.ledgit/lock` while it runs. Contention
//! fails immediately with [`Error::Locked`] instead of waiting.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::debug;

use crate::error::{Error, Result};

/// Holds the repository lock until dropped.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Tries to take the lock at `path`, creating the lock file if needed.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| Error::Locked(path.clone()))?;
        debug!("acquired lock {}", path.display());

        Ok(LockGuard { file, path })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Closing the handle releases the lock too; unlocking explicitly
        // just makes it immediate.
        let _ = FileExt::unlock(&self.file);
        debug!("released lock {}", self.path.display());
    }
}
