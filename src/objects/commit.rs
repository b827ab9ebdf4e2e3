//! Commit records.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::digest::Digest;
use crate::error::{Error, Result};
use crate::index::IndexEntry;

/// The serialized body of a commit, exactly as it is hashed and stored.
///
/// Field order is part of the format: `timestamp`, `message`, `files`,
/// `parent`. The root commit has `"parent": null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// ISO-8601 creation time, UTC with millisecond precision.
    pub timestamp: String,
    /// The commit message.
    pub message: String,
    /// The staged entries this commit snapshots, in staging order.
    pub files: Vec<IndexEntry>,
    /// The previous HEAD, or `None` for the root commit.
    pub parent: Option<Digest>,
}

impl CommitRecord {
    /// Builds a record stamped with the current time.
    pub fn new(message: impl Into<String>, files: Vec<IndexEntry>, parent: Option<Digest>) -> Self {
        CommitRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message: message.into(),
            files,
            parent,
        }
    }

    /// Serializes the record to the bytes that get hashed and stored.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::corrupt("commit", e.to_string()))
    }
}

/// A commit read back from the object store.
///
/// Commits are immutable: once written, the digest pins every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The digest this commit is stored under.
    digest: Digest,
    record: CommitRecord,
}

impl Commit {
    /// Parses the stored bytes of commit `digest`.
    ///
    /// # Errors
    ///
    /// `Error::CorruptData` if the bytes are not a commit record (for
    /// example when `digest` names a blob).
    pub fn parse(digest: Digest, data: &[u8]) -> Result<Self> {
        let record: CommitRecord = serde_json::from_slice(data)
            .map_err(|e| Error::corrupt(digest.to_hex(), format!("not a commit: {}", e)))?;
        Ok(Commit { digest, record })
    }

    /// Returns the digest of this commit.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Returns the ISO-8601 timestamp.
    pub fn timestamp(&self) -> &str {
        &self.record.timestamp
    }

    /// Returns the full commit message.
    pub fn message(&self) -> &str {
        &self.record.message
    }

    /// Returns the first line of the message.
    pub fn summary(&self) -> &str {
        self.record.message.lines().next().unwrap_or("")
    }

    /// Returns the files staged in this commit.
    pub fn files(&self) -> &[IndexEntry] {
        &self.record.files
    }

    /// Returns the first entry recorded for `path`, if any.
    ///
    /// Duplicate paths are kept in commit records; the earliest one wins.
    pub fn file(&self, path: &str) -> Option<&IndexEntry> {
        self.record.files.iter().find(|entry| entry.path() == path)
    }

    /// Returns the parent commit digest.
    pub fn parent(&self) -> Option<&Digest> {
        self.record.parent.as_ref()
    }

    /// Returns true if this is the root commit.
    pub fn is_root(&self) -> bool {
        self.record.parent.is_none()
    }

    /// Returns the underlying record.
    pub fn record(&self) -> &CommitRecord {
        &self.record
    }
}
