//! Bulk-extraction reporting order.
//!
//! This is a policy of the CLI layer, not of the core ZIP reader: entries
//! are sorted by path depth ascending, then directories before files at
//! equal depth, then lexicographically by name. It only affects the order
//! entries are written and reported in, never correctness.

use crate::simd::compare::simd_string_compare;
use crate::zip::central::CentralDirectoryEntry;

fn depth(name: &[u8]) -> usize {
    name.iter().filter(|&&b| b == b'/').count()
}

fn is_directory(name: &[u8]) -> bool {
    name.last() == Some(&b'/')
}

/// Returns indices into `entries` in extraction order.
pub fn extraction_order(entries: &[CentralDirectoryEntry<'_>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| {
        let (na, nb) = (entries[a].file_name, entries[b].file_name);
        depth(na)
            .cmp(&depth(nb))
            .then_with(|| is_directory(nb).cmp(&is_directory(na)))
            .then_with(|| simd_string_compare(na, nb))
    });
    order
}
