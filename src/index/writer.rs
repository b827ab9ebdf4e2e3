//! Index file serializer.

use super::Index;
use crate::error::{Error, Result};

/// Serializes an index to the bytes of an index file.
pub fn write(index: &Index) -> Result<Vec<u8>> {
    serde_json::to_vec(index.entries())
        .map_err(|e| Error::corrupt("index", format!("cannot serialize index: {}", e)))
}
