//! Filesystem utilities for reading and atomically writing repository files.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads the entire contents of a file as bytes.
///
/// A missing file is reported as [`Error::PathNotFound`]; every other
/// failure is passed through as [`Error::Io`].
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(path.as_ref().to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Reads a file, returning `None` if it does not exist.
pub fn read_file_opt<P: AsRef<Path>>(path: P) -> Result<Option<Vec<u8>>> {
    match read_file(path) {
        Ok(data) => Ok(Some(data)),
        Err(Error::PathNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes data to a file atomically.
///
/// The data goes to a hidden temporary file next to `path` which is then
/// renamed over the target, so readers see either the old or the new
/// content and never a partial write.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "temp".to_string());
        path.with_file_name(format!(".{}.tmp", file_name))
    };

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Creates a file with the given content unless it already exists.
///
/// Returns `true` if the file was created.
pub fn create_file_if_absent<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    write_file_atomic(path, data)?;
    Ok(true)
}
