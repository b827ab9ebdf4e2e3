//! Zlib compression for stored objects.

use crate::error::{Error, Result};

/// Compresses data using zlib at the default level.
pub fn compress(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, 6)
}

/// Decompresses zlib data read from the object file named `digest`.
///
/// Any malformed input is reported as [`Error::CorruptData`] against that
/// object.
pub fn decompress(data: &[u8], digest: &str) -> Result<Vec<u8>> {
    if data.len() < 2 || !is_valid_zlib_header(data[0], data[1]) {
        return Err(Error::corrupt(digest, "invalid zlib header"));
    }

    miniz_oxide::inflate::decompress_to_vec_zlib(data)
        .map_err(|e| Error::corrupt(digest, format!("zlib decompression failed: {:?}", e.status)))
}

/// Validates a zlib header: DEFLATE method, window size <= 7, and the
/// `(CMF * 256 + FLG) % 31 == 0` check.
fn is_valid_zlib_header(cmf: u8, flg: u8) -> bool {
    if cmf & 0x0F != 8 {
        return false;
    }
    if (cmf >> 4) > 7 {
        return false;
    }
    (u16::from(cmf) * 256 + u16::from(flg)) % 31 == 0
}
