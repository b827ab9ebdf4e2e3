//! SHA-1 content hashing.

use sha1::{Digest as _, Sha1};

/// SHA-1 hash size in bytes.
pub const SHA1_SIZE: usize = 20;

/// Computes the SHA-1 hash of the given bytes.
///
/// Blobs and serialized commit records share this one digest space; the
/// bytes are hashed as-is, with no type header.
///
/// Usage: `let hash = sha1(b"hello world");`
pub fn sha1(data: &[u8]) -> [u8; SHA1_SIZE] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_hex(bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    // H-001: Empty data hash
    #[test]
    fn test_sha1_empty() {
        assert_eq!(to_hex(&sha1(b"")), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    // H-002: "hello world" hash
    #[test]
    fn test_sha1_hello_world() {
        assert_eq!(
            to_hex(&sha1(b"hello world")),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }

    #[test]
    fn test_sha1_abc() {
        // RFC 3174 test vector
        assert_eq!(to_hex(&sha1(b"abc")), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    // H-003: Deterministic, and distinct inputs give distinct digests
    #[test]
    fn test_sha1_deterministic() {
        assert_eq!(sha1(b"line1\nline2\n"), sha1(b"line1\nline2\n"));
        assert_ne!(sha1(b"line1\nline2\n"), sha1(b"line1\nline3\n"));
    }
}
