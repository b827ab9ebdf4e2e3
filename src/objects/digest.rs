//! Content digest (SHA-1) representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::infra::hash::{sha1, SHA1_SIZE};

/// The length of a digest in bytes.
pub const DIGEST_BYTES: usize = SHA1_SIZE;

/// The length of a digest as a hexadecimal string.
pub const DIGEST_HEX_LEN: usize = DIGEST_BYTES * 2;

/// A content digest identifying a stored object.
///
/// Blobs and commits are both keyed by the SHA-1 of their stored bytes.
/// On disk and in serialized records a digest is always its lowercase
/// 40-character hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    bytes: [u8; DIGEST_BYTES],
}

impl Digest {
    /// Computes the digest of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgit::Digest;
    ///
    /// let digest = Digest::of(b"");
    /// assert_eq!(digest.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    /// ```
    pub fn of(data: &[u8]) -> Self {
        Digest { bytes: sha1(data) }
    }

    /// Creates a digest from a 40-character hexadecimal string.
    ///
    /// Upper-case input is accepted and normalized. Anything else returns
    /// `Error::InvalidDigest`.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != DIGEST_HEX_LEN {
            return Err(Error::InvalidDigest(hex_str.to_string()));
        }

        let mut bytes = [0u8; DIGEST_BYTES];
        hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(|_| Error::InvalidDigest(hex_str.to_string()))?;

        Ok(Digest { bytes })
    }

    /// Returns the lowercase hexadecimal form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the 7-character abbreviation used for display.
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Digest::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
