//! Flat, content-addressed object store.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::digest::{Digest, DIGEST_HEX_LEN};
use crate::error::{Error, Result};
use crate::infra::{compress, decompress, read_file, write_file_atomic};

/// Minimum number of hex characters accepted as an abbreviated digest.
pub const MIN_PREFIX_LEN: usize = 4;

/// A store of immutable objects keyed by digest.
///
/// Every object lives in its own file `objects/<hex digest>`; there is no
/// subdirectory sharding. Objects are never updated or deleted, so equal
/// content always maps to the single file already on disk.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// Path to the objects directory (e.g., `.ledgit/objects`).
    objects_dir: PathBuf,
    /// Whether object files are zlib-compressed on disk.
    compressed: bool,
}

impl ObjectStore {
    /// Creates an ObjectStore for the given objects directory.
    ///
    /// # Arguments
    ///
    /// * `objects_dir` - Path to the `objects` directory.
    /// * `compressed` - Whether objects are stored zlib-compressed.
    pub fn new<P: AsRef<Path>>(objects_dir: P, compressed: bool) -> Self {
        ObjectStore {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compressed,
        }
    }

    /// Returns the path of the file holding `digest`.
    pub fn object_path(&self, digest: &Digest) -> PathBuf {
        self.objects_dir.join(digest.to_hex())
    }

    /// Hashes `content` and stores it, returning its digest.
    pub fn store(&self, content: &[u8]) -> Result<Digest> {
        let digest = Digest::of(content);
        self.put(&digest, content)?;
        Ok(digest)
    }

    /// Writes `content` under `digest`.
    ///
    /// If the object already exists nothing is written: the digest fixes
    /// the content, so the existing file is already correct.
    pub fn put(&self, digest: &Digest, content: &[u8]) -> Result<()> {
        let path = self.object_path(digest);
        if path.exists() {
            debug!("object {} already stored", digest.short());
            return Ok(());
        }

        if self.compressed {
            write_file_atomic(&path, &compress(content))?;
        } else {
            write_file_atomic(&path, content)?;
        }
        debug!("stored object {} ({} bytes)", digest.short(), content.len());
        Ok(())
    }

    /// Reads the bytes stored under `digest`.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if no object exists under that digest.
    /// - `Error::CorruptData` if the bytes no longer hash to `digest`.
    pub fn get(&self, digest: &Digest) -> Result<Vec<u8>> {
        let hex = digest.to_hex();
        let raw = read_file(self.object_path(digest)).map_err(|e| match e {
            Error::PathNotFound(_) => Error::ObjectNotFound(hex.clone()),
            other => other,
        })?;

        let content = if self.compressed {
            decompress(&raw, &hex)?
        } else {
            raw
        };

        if Digest::of(&content) != *digest {
            return Err(Error::corrupt(hex, "content does not match digest"));
        }

        Ok(content)
    }

    /// Checks if an object exists in the store.
    pub fn exists(&self, digest: &Digest) -> bool {
        self.object_path(digest).is_file()
    }

    /// Finds objects whose digest starts with the given hex prefix.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDigest` if the prefix is shorter than
    /// [`MIN_PREFIX_LEN`], longer than a full digest, or not hex.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Digest>> {
        if prefix.len() < MIN_PREFIX_LEN
            || prefix.len() > DIGEST_HEX_LEN
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Error::InvalidDigest(prefix.to_string()));
        }

        let prefix = prefix.to_lowercase();
        let mut matches = Vec::new();

        for entry in fs::read_dir(&self.objects_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if name.len() == DIGEST_HEX_LEN && name.starts_with(&prefix) {
                if let Ok(digest) = Digest::from_hex(&name) {
                    matches.push(digest);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Resolves a full or abbreviated hex digest to exactly one object.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if nothing matches.
    /// - `Error::InvalidDigest` if the prefix is malformed or ambiguous.
    pub fn resolve(&self, text: &str) -> Result<Digest> {
        if text.len() == DIGEST_HEX_LEN {
            return Digest::from_hex(text);
        }

        let matches = self.find_by_prefix(text)?;
        match matches.as_slice() {
            [] => Err(Error::ObjectNotFound(text.to_string())),
            [digest] => Ok(*digest),
            _ => Err(Error::InvalidDigest(format!(
                "ambiguous digest prefix: {} ({} matches)",
                text,
                matches.len()
            ))),
        }
    }
}
