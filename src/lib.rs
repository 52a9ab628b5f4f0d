//! `unzipr` — a ZIP archive extractor core: a reserve/commit arena
//! allocator, an RFC 1951 DEFLATE decoder, an RFC 1952 GZIP envelope
//! reader, and a ZIP container reader built on top of them.

pub mod arena;
pub mod bitreader;
pub mod cli;
pub mod config;
pub mod crc32;
pub mod deflate;
pub mod error;
pub mod gzip;
pub mod huffman;
pub mod simd;
pub mod zip;

/// One-shot DEFLATE decompression. Equivalent to calling
/// [`deflate::inflate`] over a fresh [`bitreader::BitReader`].
pub use deflate::inflate;

/// GZIP member decompression with trailer verification.
pub use gzip::decompress as gunzip;

/// Locates and parses a ZIP archive's central directory.
pub use zip::{extract_all, extract_entry, locate_eocd, CentralDirectoryEntry};

/// The flat error type returned by every fallible operation in this crate.
pub use error::{ExtractError, Result};

/// The arena allocator, exposed for callers who want to manage their own
/// scratch buffers alongside extraction.
pub use arena::{Arena, OsPageAllocator, PageAllocator};
