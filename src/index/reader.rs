//! Index file parser.

use super::{Index, IndexEntry};
use crate::error::{Error, Result};

/// Parses the contents of an index file.
///
/// An empty file is accepted as an empty index.
pub fn parse(data: &[u8]) -> Result<Index> {
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Index::new());
    }

    let entries: Vec<IndexEntry> = serde_json::from_slice(data)
        .map_err(|e| Error::corrupt("index", format!("invalid index file: {}", e)))?;

    Ok(Index::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Digest;

    #[test]
    fn test_parse_entries() {
        let digest = Digest::of(b"hello\n");
        let data = format!(r#"[{{"path":"a.txt","hash":"{}"}}]"#, digest);

        let index = parse(data.as_bytes()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].path(), "a.txt");
        assert_eq!(index.entries()[0].digest(), &digest);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse(b"").unwrap().is_empty());
        assert!(parse(b"[]").unwrap().is_empty());
        assert!(parse(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_bad_digest() {
        let data = br#"[{"path":"a.txt","hash":"xyz"}]"#;
        assert!(matches!(parse(data), Err(Error::CorruptData { .. })));
    }

    #[test]
    fn test_parse_wrong_shape() {
        assert!(parse(br#"{"path":"a.txt"}"#).is_err());
    }
}
