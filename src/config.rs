//! Compile-time configuration constants for the arena allocator and ZIP
//! reader.
//!
//! IS_CONSOLE(stream)-style platform toggles are unnecessary in Rust: binary
//! mode is implicit in `std::fs::File`, and verbosity is a runtime atomic in
//! `cli::constants` rather than a compile-time flag.

/// Bytes occupied by the arena header at the start of every arena's
/// committed range. User allocations start at or after this offset.
pub const ARENA_HEADER_SIZE: usize = 128;

/// Default size reserved (virtual address space only) for a fresh arena
/// when the caller does not specify one. 64 MiB of address space is cheap
/// to reserve and rarely needs to chain more than once for a typical
/// archive.
pub const ARENA_DEFAULT_RESERVE_SIZE: usize = 64 * 1024 * 1024;

/// Default commit granularity: how much physical memory is backed at a
/// time as the bump pointer advances past the committed prefix.
pub const ARENA_DEFAULT_COMMIT_SIZE: usize = 64 * 1024;

/// Fallback page size used if the OS query fails. Every real target this
/// crate supports reports 4096 or a multiple of it.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Maximum size of the EOCD record plus trailing comment that
/// `zip::eocd::locate` will search: 22-byte fixed header + 65535-byte max
/// comment length (comment length is a u16 field).
pub const EOCD_SEARCH_WINDOW: usize = 22 + 0xFFFF;

/// Maximum back-reference distance in a DEFLATE stream (32 KiB window).
pub const DEFLATE_MAX_DISTANCE: usize = 32 * 1024;
