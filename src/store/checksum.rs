//! CRC32 checksums for state files
//!
//! Format: `crc32:XXXXXXXX` (lowercase hex, zero-padded)

use crc32fast::Hasher;

/// CRC32 (IEEE) of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Inverse of `format_checksum`; `None` on malformed input.
pub fn parse_checksum(formatted: &str) -> Option<u32> {
    let hex = formatted.strip_prefix("crc32:")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
