//! DEFLATE (RFC 1951) block dispatch and decode loop.
//!
//! Decodes stored, fixed-Huffman, and dynamic-Huffman blocks into a
//! caller-supplied, append-only `Vec<u8>`. Back-reference copies are done
//! byte-by-byte so that overlapping runs (`length > distance`) consume
//! freshly appended bytes rather than being corrupted by a bulk `memcpy` —
//! see DESIGN.md for why `Vec::extend_from_within` cannot be used here.

use crate::bitreader::BitReader;
use crate::config::DEFLATE_MAX_DISTANCE;
use crate::error::{ExtractError, Result};
use crate::huffman::HuffmanDecoder;

use super::tables::{
    fixed_dist_lengths, fixed_litlen_lengths, CODE_LENGTH_ORDER, DIST_BASE, DIST_EXTRA,
    LENGTH_BASE, LENGTH_EXTRA,
};

/// Decodes a complete DEFLATE stream (one or more blocks, terminated by the
/// block with `BFINAL = 1`) from `reader`, appending decoded bytes to
/// `output`.
pub fn inflate(reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
    loop {
        let bfinal = reader.read_bit()?;
        let btype = reader.read_bits(2)?;
        match btype {
            0 => inflate_stored(reader, output)?,
            1 => inflate_fixed(reader, output)?,
            2 => inflate_dynamic(reader, output)?,
            3 => return Err(ExtractError::InvalidBlock("reserved block type 3")),
            _ => unreachable!(),
        }
        if bfinal {
            return Ok(());
        }
    }
}

fn inflate_stored(reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
    reader.align_to_byte();
    let len = reader.read_u16_le()?;
    let nlen = reader.read_u16_le()?;
    if len != !nlen {
        return Err(ExtractError::InvalidBlock("stored block LEN != !NLEN"));
    }
    let start = output.len();
    output.resize(start + len as usize, 0);
    reader.read_bytes(&mut output[start..])?;
    Ok(())
}

fn inflate_fixed(reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
    let litlen = HuffmanDecoder::from_lengths(&fixed_litlen_lengths())?;
    let dist = HuffmanDecoder::from_lengths(&fixed_dist_lengths())?;
    decode_block_body(reader, &litlen, &dist, output)
}

fn inflate_dynamic(reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
    let hlit = reader.read_bits(5)? as usize + 257;
    let hdist = reader.read_bits(5)? as usize + 1;
    let hclen = reader.read_bits(4)? as usize + 4;

    let mut cl_lengths = [0u8; 19];
    for &pos in CODE_LENGTH_ORDER.iter().take(hclen) {
        cl_lengths[pos] = reader.read_bits(3)? as u8;
    }
    let cl_decoder = HuffmanDecoder::from_lengths(&cl_lengths)?;

    let total = hlit + hdist;
    let mut lengths = Vec::with_capacity(total);
    while lengths.len() < total {
        let sym = cl_decoder.decode(reader)?;
        match sym {
            0..=15 => lengths.push(sym as u8),
            16 => {
                let prev = *lengths
                    .last()
                    .ok_or(ExtractError::InvalidBlock("code 16 with no previous length"))?;
                let repeat = reader.read_bits(2)? + 3;
                for _ in 0..repeat {
                    lengths.push(prev);
                }
            }
            17 => {
                let repeat = reader.read_bits(3)? + 3;
                lengths.extend(std::iter::repeat(0).take(repeat as usize));
            }
            18 => {
                let repeat = reader.read_bits(7)? + 11;
                lengths.extend(std::iter::repeat(0).take(repeat as usize));
            }
            _ => return Err(ExtractError::InvalidHuffmanCode),
        }
    }
    lengths.truncate(total);

    let litlen = HuffmanDecoder::from_lengths(&lengths[..hlit])?;
    let dist = HuffmanDecoder::from_lengths(&lengths[hlit..])?;
    decode_block_body(reader, &litlen, &dist, output)
}

fn decode_block_body(
    reader: &mut BitReader<'_>,
    litlen: &HuffmanDecoder,
    dist: &HuffmanDecoder,
    output: &mut Vec<u8>,
) -> Result<()> {
    loop {
        let sym = litlen.decode(reader)?;
        if sym < 256 {
            output.push(sym as u8);
            continue;
        }
        if sym == 256 {
            return Ok(());
        }
        let idx = (sym - 257) as usize;
        if idx >= LENGTH_BASE.len() {
            return Err(ExtractError::InvalidBlock("literal/length symbol out of range"));
        }
        let extra = reader.read_bits(LENGTH_EXTRA[idx] as u32)?;
        let length = LENGTH_BASE[idx] as usize + extra as usize;

        let dsym = dist.decode(reader)?;
        if dsym as usize >= DIST_BASE.len() {
            return Err(ExtractError::InvalidDistance);
        }
        let dextra = reader.read_bits(DIST_EXTRA[dsym as usize] as u32)?;
        let distance = DIST_BASE[dsym as usize] as usize + dextra as usize;

        if distance > DEFLATE_MAX_DISTANCE || distance > output.len() {
            return Err(ExtractError::InvalidDistance);
        }

        let copy_start = output.len() - distance;
        for i in 0..length {
            let byte = output[copy_start + (i % distance)];
            output.push(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_lsb_first(bits: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut byte = 0u8;
        let mut pos = 0u8;
        for &b in bits {
            byte |= b << pos;
            pos += 1;
            if pos == 8 {
                bytes.push(byte);
                byte = 0;
                pos = 0;
            }
        }
        if pos > 0 {
            bytes.push(byte);
        }
        bytes
    }

    #[test]
    fn stored_block_round_trip() {
        let mut bytes = pack_lsb_first(&[1, 0, 0]); // BFINAL=1, BTYPE=00
        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(&(!5u16).to_le_bytes());
        bytes.extend_from_slice(b"Hello");

        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        inflate(&mut reader, &mut out).unwrap();
        assert_eq!(out, b"Hello");
    }

    #[test]
    fn stored_block_len_zero_produces_nothing() {
        let mut bytes = pack_lsb_first(&[1, 0, 0]);
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&(!0u16).to_le_bytes());
        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        inflate(&mut reader, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn stored_block_rejects_bad_nlen() {
        let mut bytes = pack_lsb_first(&[1, 0, 0]);
        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(&5u16.to_le_bytes()); // wrong, should be !5
        bytes.extend_from_slice(b"Hello");
        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        assert!(matches!(
            inflate(&mut reader, &mut out),
            Err(ExtractError::InvalidBlock(_))
        ));
    }

    #[test]
    fn reserved_block_type_is_rejected() {
        let bytes = pack_lsb_first(&[1, 1, 1]); // BFINAL=1, BTYPE=11
        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        assert!(matches!(
            inflate(&mut reader, &mut out),
            Err(ExtractError::InvalidBlock(_))
        ));
    }

    /// Builds canonical `(code, bit_length)` pairs the same way
    /// `HuffmanDecoder::from_lengths` does, so tests can hand-encode a
    /// fixed-Huffman bit stream without re-deriving RFC 1951 tables.
    fn canonical_codes(lengths: &[u8]) -> std::collections::HashMap<u16, (u32, u8)> {
        let mut bl_count = [0u32; 16];
        for &l in lengths {
            if l > 0 {
                bl_count[l as usize] += 1;
            }
        }
        let mut next_code = [0u32; 17];
        let mut code = 0u32;
        for bits in 1..=15usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }
        let mut map = std::collections::HashMap::new();
        for (symbol, &length) in lengths.iter().enumerate() {
            if length == 0 {
                continue;
            }
            let assigned = next_code[length as usize];
            next_code[length as usize] += 1;
            map.insert(symbol as u16, (assigned, length));
        }
        map
    }

    /// Appends a symbol's canonical code bits, MSB-first, to `bits` (which
    /// is later packed LSB-first into bytes — matching what `BitReader`
    /// expects to consume).
    fn push_symbol_bits(bits: &mut Vec<u8>, codes: &std::collections::HashMap<u16, (u32, u8)>, symbol: u16) {
        let (code, len) = codes[&symbol];
        for i in (0..len).rev() {
            bits.push(((code >> i) & 1) as u8);
        }
    }

    #[test]
    fn fixed_block_back_reference_run() {
        let litlen_codes = canonical_codes(&fixed_litlen_lengths());
        let dist_codes = canonical_codes(&fixed_dist_lengths());

        let mut bits = vec![1u8, 1, 0]; // BFINAL=1, BTYPE=01 (fixed)
        push_symbol_bits(&mut bits, &litlen_codes, b'A' as u16);
        push_symbol_bits(&mut bits, &litlen_codes, 259); // length base 5, 0 extra bits
        push_symbol_bits(&mut bits, &dist_codes, 0); // distance base 1, 0 extra bits
        push_symbol_bits(&mut bits, &litlen_codes, 256); // end of block

        let bytes = pack_lsb_first(&bits);
        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        inflate(&mut reader, &mut out).unwrap();
        assert_eq!(out, b"AAAAAA");
    }

    #[test]
    fn rejects_distance_exceeding_output_length() {
        let litlen_codes = canonical_codes(&fixed_litlen_lengths());
        let dist_codes = canonical_codes(&fixed_dist_lengths());

        let mut bits = vec![1u8, 1, 0];
        push_symbol_bits(&mut bits, &litlen_codes, b'A' as u16);
        push_symbol_bits(&mut bits, &litlen_codes, 259); // length 5
        push_symbol_bits(&mut bits, &dist_codes, 3); // distance base 4 > 1 byte of output
        push_symbol_bits(&mut bits, &litlen_codes, 256);

        let bytes = pack_lsb_first(&bits);
        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        assert!(matches!(
            inflate(&mut reader, &mut out),
            Err(ExtractError::InvalidDistance)
        ));
    }
}
