//! Canonical Huffman decoder construction and bit-by-bit decoding, per
//! RFC 1951 §3.2.2.

use crate::bitreader::BitReader;
use crate::error::{ExtractError, Result};

const MAX_BITS: u32 = 15;
const MAX_SYMBOLS: usize = 288;

/// A `(code, bit_length, symbol)` entry. Sorted by `(bit_length, symbol)`
/// ascending, which is also ascending canonical-code order.
#[derive(Debug, Clone, Copy)]
struct Code {
    code: u32,
    bit_length: u8,
    symbol: u16,
}

/// A canonical Huffman decoder built from a code-length vector.
#[derive(Debug)]
pub struct HuffmanDecoder {
    codes: Vec<Code>,
}

impl HuffmanDecoder {
    /// Builds a decoder from a length vector `lengths[0..n]`, `n <= 288`,
    /// each length `<= 15`. Zero means "symbol not present".
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        if lengths.len() > MAX_SYMBOLS {
            return Err(ExtractError::InvalidHuffmanCode);
        }
        if lengths.iter().any(|&l| l as u32 > MAX_BITS) {
            return Err(ExtractError::InvalidHuffmanCode);
        }
        if lengths.iter().all(|&l| l == 0) {
            return Err(ExtractError::InvalidHuffmanCode);
        }

        let mut bl_count = [0u32; (MAX_BITS + 1) as usize];
        for &l in lengths {
            if l > 0 {
                bl_count[l as usize] += 1;
            }
        }

        let mut next_code = [0u32; (MAX_BITS + 2) as usize];
        let mut code = 0u32;
        for bits in 1..=MAX_BITS as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let mut codes = Vec::with_capacity(lengths.len());
        for (symbol, &length) in lengths.iter().enumerate() {
            if length == 0 {
                continue;
            }
            let assigned = next_code[length as usize];
            next_code[length as usize] += 1;
            codes.push(Code { code: assigned, bit_length: length, symbol: symbol as u16 });
        }
        codes.sort_by_key(|c| (c.bit_length, c.symbol));

        Ok(HuffmanDecoder { codes })
    }

    /// Decodes one symbol, consuming bits MSB-first into an accumulator and
    /// trying lengths 1..=15 until a match is found.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut acc: u32 = 0;
        for bits_read in 1..=MAX_BITS {
            let bit = reader.read_bit()?;
            acc = (acc << 1) | (bit as u32);
            for c in &self.codes {
                if c.bit_length as u32 == bits_read && c.code == acc {
                    return Ok(c.symbol);
                }
            }
        }
        Err(ExtractError::InvalidHuffmanCode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_over_15() {
        assert!(matches!(
            HuffmanDecoder::from_lengths(&[16]),
            Err(ExtractError::InvalidHuffmanCode)
        ));
    }

    #[test]
    fn rejects_all_zero_lengths() {
        assert!(matches!(
            HuffmanDecoder::from_lengths(&[0, 0, 0]),
            Err(ExtractError::InvalidHuffmanCode)
        ));
    }

    #[test]
    fn builds_and_decodes_rfc1951_example() {
        // RFC 1951 §3.2.2 example: symbols A,B,C,D with lengths 2,1,3,3
        // canonical codes: A=10, B=0, C=110, D=111
        let lengths = [2u8, 1, 3, 3]; // A B C D
        let dec = HuffmanDecoder::from_lengths(&lengths).unwrap();

        // Encode "B A C D" = 0 10 110 111 = bits, LSB-first packing per byte
        // Build a byte stream by packing bits MSB-first conceptually, but our
        // BitReader reads LSB-first, so we must place bits in the order the
        // reader will consume them: bit 0 of byte 0 first.
        let bits = [0u8, 1, 0, 1, 1, 0, 1, 1, 1];
        let mut byte = 0u8;
        let mut bitpos = 0u8;
        let mut bytes = Vec::new();
        for b in bits {
            byte |= b << bitpos;
            bitpos += 1;
            if bitpos == 8 {
                bytes.push(byte);
                byte = 0;
                bitpos = 0;
            }
        }
        if bitpos > 0 {
            bytes.push(byte);
        }

        let mut reader = BitReader::new(&bytes);
        assert_eq!(dec.decode(&mut reader).unwrap(), 1); // B
        assert_eq!(dec.decode(&mut reader).unwrap(), 0); // A
        assert_eq!(dec.decode(&mut reader).unwrap(), 2); // C
        assert_eq!(dec.decode(&mut reader).unwrap(), 3); // D
    }

    #[test]
    fn fails_after_15_bits_without_match() {
        // A single symbol of length 1 means code "0"; feeding all-ones bits
        // never matches and must fail after 15 bits.
        let dec = HuffmanDecoder::from_lengths(&[1]).unwrap();
        let mut reader = BitReader::new(&[0xFF, 0xFF, 0xFF]);
        assert!(matches!(
            dec.decode(&mut reader),
            Err(ExtractError::InvalidHuffmanCode)
        ));
    }
}
