//! Blob objects (raw file content).

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Number of leading bytes inspected by [`Blob::is_binary`].
const BINARY_CHECK_LEN: usize = 8000;

/// The stored content of one file snapshot.
///
/// A blob carries no path or metadata; the path lives in the index entry
/// or commit record that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content: Vec<u8>,
}

impl Blob {
    /// Wraps bytes read from the object store.
    pub fn new(content: Vec<u8>) -> Self {
        Blob { content }
    }

    /// Returns the raw content of the blob.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content as a UTF-8 string, if valid.
    pub fn content_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.content)
            .map_err(|_| Error::corrupt("blob", "content is not valid UTF-8"))
    }

    /// Returns the content as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Returns the size of the blob content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content appears to be binary.
    ///
    /// Same heuristic as git: a NUL byte within the first 8000 bytes.
    pub fn is_binary(&self) -> bool {
        let check_len = self.content.len().min(BINARY_CHECK_LEN);
        self.content[..check_len].contains(&0)
    }
}
