//! ZIP container reader: End-of-Central-Directory discovery, central
//! directory walk, and per-entry extraction.

pub mod central;
pub mod eocd;
pub mod extract;

pub use central::CentralDirectoryEntry;
pub use eocd::locate_eocd;
pub use extract::{extract_all, extract_entry};
