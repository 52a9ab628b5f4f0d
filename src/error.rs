//! The flat error taxonomy shared by every component: arena, bit reader,
//! Huffman decoder, DEFLATE engine, GZIP envelope, and ZIP reader.
//!
//! Kept as a plain hand-written enum with manual `Display`/`Error` impls,
//! matching the style of [`crate::block`]'s `Lz4Error` and `DecompressError`
//! rather than pulling in a derive-macro error crate.

use std::fmt;

/// Every error this crate can return. Each callsite maps to exactly one
/// variant.
#[derive(Debug)]
pub enum ExtractError {
    /// Missing/wrong GZIP or ZIP signature, or an out-of-bounds structural
    /// read.
    InvalidMagic,
    /// Compression method other than DEFLATE in GZIP, or not in `{0, 8}` in
    /// ZIP.
    UnsupportedMethod(u16),
    /// Malformed GZIP header or flag-indicated section.
    InvalidHeader(&'static str),
    /// Computed CRC-32 did not match the stored CRC-32.
    InvalidChecksum { expected: u32, actual: u32 },
    /// GZIP ISIZE trailer did not match the decompressed length.
    InvalidSize { expected: u32, actual: u32 },
    /// DEFLATE reserved block type, stored `LEN != !NLEN`, or a dynamic
    /// run-length code with no previous code length to repeat.
    InvalidBlock(&'static str),
    /// Huffman code length vector was malformed, or 15 bits were consumed
    /// without matching a code.
    InvalidHuffmanCode,
    /// Back-reference distance symbol was out of range, or the distance
    /// exceeds the amount of output produced so far.
    InvalidDistance,
    /// A bit or byte reader ran past the end of its input.
    UnexpectedEof,
    /// The arena could not reserve or commit the requested memory.
    OutOfMemory,
    /// A filesystem operation during extraction failed.
    Io(std::io::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidMagic => write!(f, "invalid or missing signature"),
            ExtractError::UnsupportedMethod(m) => {
                write!(f, "unsupported compression method {m}")
            }
            ExtractError::InvalidHeader(what) => write!(f, "invalid header: {what}"),
            ExtractError::InvalidChecksum { expected, actual } => write!(
                f,
                "checksum mismatch: expected {expected:#010x}, got {actual:#010x}"
            ),
            ExtractError::InvalidSize { expected, actual } => write!(
                f,
                "size mismatch: expected {expected} bytes, got {actual}"
            ),
            ExtractError::InvalidBlock(what) => write!(f, "invalid block: {what}"),
            ExtractError::InvalidHuffmanCode => write!(f, "invalid huffman code"),
            ExtractError::InvalidDistance => write!(f, "invalid back-reference distance"),
            ExtractError::UnexpectedEof => write!(f, "unexpected end of input"),
            ExtractError::OutOfMemory => write!(f, "arena could not reserve or commit memory"),
            ExtractError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Io(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
