//! Per-entry and bulk extraction.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::cli::order::extraction_order;
use crate::crc32::Crc32State;
use crate::deflate;
use crate::bitreader::BitReader;
use crate::error::{ExtractError, Result};
use crate::zip::central::CentralDirectoryEntry;

const LOCAL_HEADER_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const LOCAL_HEADER_FIXED_SIZE: usize = 30;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// Decompresses and CRC-checks a single entry's file data, found via its
/// local file header.
pub fn extract_entry(data: &[u8], entry: &CentralDirectoryEntry<'_>) -> Result<Vec<u8>> {
    let offset = entry.local_header_offset as usize;
    if offset + LOCAL_HEADER_FIXED_SIZE > data.len() {
        return Err(ExtractError::InvalidMagic);
    }
    let header = &data[offset..offset + LOCAL_HEADER_FIXED_SIZE];
    if header[0..4] != LOCAL_HEADER_SIGNATURE {
        return Err(ExtractError::InvalidMagic);
    }
    let name_len = u16::from_le_bytes([header[26], header[27]]) as usize;
    let extra_len = u16::from_le_bytes([header[28], header[29]]) as usize;

    let body_start = offset + LOCAL_HEADER_FIXED_SIZE + name_len + extra_len;
    let body_end = body_start.checked_add(entry.compressed_size as usize).ok_or(ExtractError::InvalidMagic)?;
    if body_end > data.len() {
        return Err(ExtractError::InvalidMagic);
    }
    let body = &data[body_start..body_end];

    let output = match entry.compression_method {
        METHOD_STORED => body.to_vec(),
        METHOD_DEFLATE => {
            let mut output = Vec::with_capacity(entry.uncompressed_size as usize);
            let mut reader = BitReader::new(body);
            deflate::inflate(&mut reader, &mut output)?;
            output
        }
        other => return Err(ExtractError::UnsupportedMethod(other)),
    };

    if output.len() as u64 != entry.uncompressed_size as u64 {
        crate::displaylevel!(
            2,
            "[warn] ({}): decompressed size {} does not match central directory size {}\n",
            String::from_utf8_lossy(entry.file_name),
            output.len(),
            entry.uncompressed_size
        );
    }
    let actual_crc = Crc32State::new().update(&output).finalize();
    if actual_crc != entry.crc32 {
        return Err(ExtractError::InvalidChecksum { expected: entry.crc32, actual: actual_crc });
    }

    Ok(output)
}

/// Resolves an entry's archive-relative name to a path under `destination`,
/// rejecting absolute paths and `..` components that would escape it.
fn safe_output_path(destination: &Path, file_name: &[u8]) -> Result<PathBuf> {
    let name = String::from_utf8_lossy(file_name);
    let relative = Path::new(name.as_ref());
    if relative.is_absolute() {
        return Err(ExtractError::InvalidHeader("entry path is absolute"));
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::InvalidHeader("entry path escapes destination"));
            }
        }
    }
    Ok(destination.join(relative))
}

fn is_directory_entry(file_name: &[u8]) -> bool {
    file_name.last() == Some(&b'/')
}

/// Extracts every entry in `entries` to `destination`, in the reporting
/// order defined by [`crate::cli::order::extraction_order`]. Continues past
/// per-entry failures, collecting them rather than aborting the whole
/// archive; directories are created as needed before files are written.
pub fn extract_all(
    data: &[u8],
    entries: &[CentralDirectoryEntry<'_>],
    destination: &Path,
) -> Vec<(usize, Result<PathBuf>)> {
    let order = extraction_order(entries);
    let mut results = Vec::with_capacity(order.len());

    for index in order {
        let entry = &entries[index];
        let outcome = (|| -> Result<PathBuf> {
            let path = safe_output_path(destination, entry.file_name)?;
            if is_directory_entry(entry.file_name) {
                fs::create_dir_all(&path)?;
                return Ok(path);
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let contents = extract_entry(data, entry)?;
            fs::write(&path, &contents)?;
            Ok(path)
        })();
        results.push((index, outcome));
    }

    results
}
