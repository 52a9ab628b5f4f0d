//! Central directory walk.

use crate::error::{ExtractError, Result};
use crate::zip::eocd::EndOfCentralDirectory;

const CENTRAL_HEADER_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const CENTRAL_HEADER_FIXED_SIZE: usize = 46;

/// A single central directory record. `file_name` borrows directly from the
/// archive buffer; it is not required to be valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryEntry<'a> {
    pub file_name: &'a [u8],
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub compression_method: u16,
    pub crc32: u32,
    pub local_header_offset: u32,
}

/// Walks `eocd.total_entries` fixed-size central directory records starting
/// at `eocd.central_directory_offset`.
pub fn read_central_directory<'a>(
    data: &'a [u8],
    eocd: &EndOfCentralDirectory,
) -> Result<Vec<CentralDirectoryEntry<'a>>> {
    let mut entries = Vec::with_capacity(eocd.total_entries as usize);
    let mut pos = eocd.central_directory_offset as usize;
    let cd_end = pos
        .checked_add(eocd.central_directory_size as usize)
        .ok_or(ExtractError::InvalidMagic)?;
    if cd_end > data.len() {
        return Err(ExtractError::InvalidMagic);
    }

    for _ in 0..eocd.total_entries {
        if pos + CENTRAL_HEADER_FIXED_SIZE > cd_end {
            return Err(ExtractError::InvalidMagic);
        }
        let record = &data[pos..pos + CENTRAL_HEADER_FIXED_SIZE];
        if record[0..4] != CENTRAL_HEADER_SIGNATURE {
            return Err(ExtractError::InvalidMagic);
        }

        let compression_method = u16::from_le_bytes([record[10], record[11]]);
        let crc32 = u32::from_le_bytes([record[16], record[17], record[18], record[19]]);
        let compressed_size = u32::from_le_bytes([record[20], record[21], record[22], record[23]]);
        let uncompressed_size = u32::from_le_bytes([record[24], record[25], record[26], record[27]]);
        let name_len = u16::from_le_bytes([record[28], record[29]]) as usize;
        let extra_len = u16::from_le_bytes([record[30], record[31]]) as usize;
        let comment_len = u16::from_le_bytes([record[32], record[33]]) as usize;
        let local_header_offset = u32::from_le_bytes([record[42], record[43], record[44], record[45]]);

        let name_start = pos + CENTRAL_HEADER_FIXED_SIZE;
        let name_end = name_start.checked_add(name_len).ok_or(ExtractError::InvalidMagic)?;
        if name_end > cd_end {
            return Err(ExtractError::InvalidMagic);
        }
        let file_name = &data[name_start..name_end];

        pos = name_end
            .checked_add(extra_len)
            .and_then(|p| p.checked_add(comment_len))
            .ok_or(ExtractError::InvalidMagic)?;
        if pos > cd_end {
            return Err(ExtractError::InvalidMagic);
        }

        entries.push(CentralDirectoryEntry {
            file_name,
            compressed_size,
            uncompressed_size,
            compression_method,
            crc32,
            local_header_offset,
        });
    }

    Ok(entries)
}
