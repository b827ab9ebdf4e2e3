//! Staging index operations.
//!
//! The index file (`.ledgit/index`) holds the ordered list of
//! `(path, digest)` pairs waiting for the next commit, as a JSON array of
//! `{"path": ..., "hash": ...}` objects.
//!
//! The list is append-only between commits. Staging the same path twice
//! keeps both entries; nothing is deduplicated and order is insertion order.
//! Each mutation rewrites the whole file, so concurrent writers would lose
//! updates; the repository serializes mutations with its lock.

mod reader;
mod writer;

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::infra::{read_file_opt, write_file_atomic};
use crate::objects::Digest;

pub use reader::parse;
pub use writer::write;

/// One staged file: its repository-relative path and blob digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    path: String,
    #[serde(rename = "hash")]
    digest: Digest,
}

impl IndexEntry {
    /// Creates a new IndexEntry.
    pub fn new(path: impl Into<String>, digest: Digest) -> Self {
        IndexEntry {
            path: path.into(),
            digest,
        }
    }

    /// Returns the path as it was staged.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the digest of the staged blob.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

/// The staged entries, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index from existing entries.
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Index { entries }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in staging order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Returns the first entry staged for `path`.
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Appends an entry, keeping any earlier entry for the same path.
    pub fn push(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Consumes the index, returning its entries.
    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The persisted staging index.
///
/// Every operation is a complete load, modify, save cycle against the file;
/// nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    /// Creates a handle for the index file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        IndexFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current index. A missing file is an empty index.
    pub fn current(&self) -> Result<Index> {
        match read_file_opt(&self.path)? {
            Some(data) => parse(&data),
            None => Ok(Index::new()),
        }
    }

    /// Appends `(path, digest)` and persists the whole index.
    pub fn append(&self, path: impl Into<String>, digest: Digest) -> Result<()> {
        let mut index = self.current()?;
        let entry = IndexEntry::new(path, digest);
        debug!("staging {} as {}", entry.path(), digest.short());
        index.push(entry);
        self.save(&index)
    }

    /// Returns the current entries and persists an empty index.
    pub fn snapshot_and_clear(&self) -> Result<Vec<IndexEntry>> {
        let index = self.current()?;
        self.save(&Index::new())?;
        debug!("cleared index ({} entries snapshotted)", index.len());
        Ok(index.into_entries())
    }

    /// Overwrites the index file with `index`.
    pub fn save(&self, index: &Index) -> Result<()> {
        write_file_atomic(&self.path, &write(index)?)
    }
}
