//! RFC 1952 GZIP envelope: header parsing, DEFLATE body, and trailer
//! verification.

use crate::bitreader::BitReader;
use crate::crc32::Crc32State;
use crate::deflate;
use crate::error::{ExtractError, Result};

const MAGIC: [u8; 2] = [0x1F, 0x8B];
const METHOD_DEFLATE: u8 = 0x08;

const FLAG_FHCRC: u8 = 1 << 1;
const FLAG_FEXTRA: u8 = 1 << 2;
const FLAG_FNAME: u8 = 1 << 3;
const FLAG_FCOMMENT: u8 = 1 << 4;

/// Decompresses a complete GZIP member, verifying the trailing CRC-32 and
/// ISIZE fields. Returns the decompressed bytes.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 10 {
        return Err(ExtractError::InvalidMagic);
    }
    if data[0..2] != MAGIC {
        return Err(ExtractError::InvalidMagic);
    }
    let method = data[2];
    if method != METHOD_DEFLATE {
        return Err(ExtractError::UnsupportedMethod(method as u16));
    }
    let flags = data[3];

    let mut pos = 10usize;
    if flags & FLAG_FEXTRA != 0 {
        if pos + 2 > data.len() {
            return Err(ExtractError::InvalidHeader("truncated FEXTRA length"));
        }
        let xlen = u16::from_le_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2 + xlen;
        if pos > data.len() {
            return Err(ExtractError::InvalidHeader("truncated FEXTRA payload"));
        }
    }
    if flags & FLAG_FNAME != 0 {
        pos = skip_nul_terminated(data, pos)?;
    }
    if flags & FLAG_FCOMMENT != 0 {
        pos = skip_nul_terminated(data, pos)?;
    }
    if flags & FLAG_FHCRC != 0 {
        pos += 2;
        if pos > data.len() {
            return Err(ExtractError::InvalidHeader("truncated FHCRC"));
        }
    }

    if pos + 8 > data.len() {
        return Err(ExtractError::InvalidHeader("truncated before trailer"));
    }

    let mut output = Vec::new();
    let mut reader = BitReader::new(&data[pos..data.len() - 8]);
    deflate::inflate(&mut reader, &mut output)?;

    let trailer = &data[data.len() - 8..];
    let expected_crc = u32::from_le_bytes(trailer[0..4].try_into().unwrap());
    let expected_isize = u32::from_le_bytes(trailer[4..8].try_into().unwrap());

    let actual_crc = Crc32State::new().update(&output).finalize();
    if actual_crc != expected_crc {
        return Err(ExtractError::InvalidChecksum { expected: expected_crc, actual: actual_crc });
    }

    let actual_isize = (output.len() as u64 % (1u64 << 32)) as u32;
    if actual_isize != expected_isize {
        return Err(ExtractError::InvalidSize { expected: expected_isize, actual: actual_isize });
    }

    Ok(output)
}

fn skip_nul_terminated(data: &[u8], start: usize) -> Result<usize> {
    let rel = data[start..]
        .iter()
        .position(|&b| b == 0)
        .ok_or(ExtractError::InvalidHeader("unterminated string field"))?;
    Ok(start + rel + 1)
}
