//! End-of-Central-Directory record discovery.

use crate::config::EOCD_SEARCH_WINDOW;
use crate::error::{ExtractError, Result};
use crate::simd::search::simd_mem_rsearch;

const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
const EOCD_FIXED_SIZE: usize = 22;

/// Fields decoded from the archive's End-of-Central-Directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
}

/// Locates and parses the EOCD record, searching the last
/// `min(data.len(), EOCD_SEARCH_WINDOW)` bytes for the signature so a
/// trailing archive comment (up to 65535 bytes) doesn't prevent discovery.
///
/// When the signature occurs more than once in the window (e.g. inside a
/// comment), the last occurrence is preferred, matching how most tools
/// resolve the ambiguity.
pub fn locate_eocd(data: &[u8]) -> Result<EndOfCentralDirectory> {
    if data.len() < EOCD_FIXED_SIZE {
        return Err(ExtractError::InvalidMagic);
    }
    let window_start = data.len().saturating_sub(EOCD_SEARCH_WINDOW);
    let window = &data[window_start..];
    let rel = simd_mem_rsearch(window, &EOCD_SIGNATURE).ok_or(ExtractError::InvalidMagic)?;
    let start = window_start + rel;
    if start + EOCD_FIXED_SIZE > data.len() {
        return Err(ExtractError::InvalidMagic);
    }
    let record = &data[start..start + EOCD_FIXED_SIZE];

    let total_entries = u16::from_le_bytes([record[10], record[11]]);
    let central_directory_size = u32::from_le_bytes([record[12], record[13], record[14], record[15]]);
    let central_directory_offset = u32::from_le_bytes([record[16], record[17], record[18], record[19]]);

    Ok(EndOfCentralDirectory { total_entries, central_directory_size, central_directory_offset })
}
