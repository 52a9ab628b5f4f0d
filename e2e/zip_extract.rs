//! End-to-end ZIP extraction: builds a synthetic archive in memory and
//! verifies the files it produces on disk.

use std::fs;

use unzipr::crc32::crc32_scalar;
use unzipr::zip::{central::read_central_directory, extract_all, locate_eocd, CentralDirectoryEntry};

const LOCAL_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const CENTRAL_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

struct Entry {
    name: &'static str,
    contents: &'static [u8],
}

fn build_archive(entries: &[Entry]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut central = Vec::new();
    let mut offsets = Vec::with_capacity(entries.len());

    for entry in entries {
        let is_dir = entry.name.ends_with('/');
        let crc = crc32_scalar(entry.contents);

        offsets.push(data.len() as u32);
        data.extend_from_slice(&LOCAL_SIGNATURE);
        data.extend_from_slice(&20u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // STORED
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&crc.to_le_bytes());
        data.extend_from_slice(&(entry.contents.len() as u32).to_le_bytes());
        data.extend_from_slice(&(entry.contents.len() as u32).to_le_bytes());
        data.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(entry.name.as_bytes());
        if !is_dir {
            data.extend_from_slice(entry.contents);
        }

        central.extend_from_slice(&CENTRAL_SIGNATURE);
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&(entry.contents.len() as u32).to_le_bytes());
        central.extend_from_slice(&(entry.contents.len() as u32).to_le_bytes());
        central.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u32.to_le_bytes());
        central.extend_from_slice(&offsets[offsets.len() - 1].to_le_bytes());
        central.extend_from_slice(entry.name.as_bytes());
    }

    let cd_offset = data.len() as u32;
    let cd_size = central.len() as u32;
    data.extend_from_slice(&central);

    data.extend_from_slice(&EOCD_SIGNATURE);
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    data.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    data.extend_from_slice(&cd_size.to_le_bytes());
    data.extend_from_slice(&cd_offset.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());

    data
}

#[test]
fn extracts_nested_files_and_directories() {
    let entries = [
        Entry { name: "readme.txt", contents: b"top level" },
        Entry { name: "docs/", contents: b"" },
        Entry { name: "docs/guide.txt", contents: b"nested contents" },
    ];
    let archive = build_archive(&entries);

    let eocd = locate_eocd(&archive).unwrap();
    let central_entries: Vec<CentralDirectoryEntry<'_>> =
        read_central_directory(&archive, &eocd).unwrap();

    let dest = tempfile::tempdir().unwrap();
    let results = extract_all(&archive, &central_entries, dest.path());
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    assert_eq!(fs::read(dest.path().join("readme.txt")).unwrap(), b"top level");
    assert!(dest.path().join("docs").is_dir());
    assert_eq!(fs::read(dest.path().join("docs/guide.txt")).unwrap(), b"nested contents");
}

#[test]
fn path_traversal_entry_is_rejected_without_writing() {
    let entries = [Entry { name: "../escape.txt", contents: b"malicious" }];
    let archive = build_archive(&entries);

    let eocd = locate_eocd(&archive).unwrap();
    let central_entries = read_central_directory(&archive, &eocd).unwrap();

    let dest = tempfile::tempdir().unwrap();
    let results = extract_all(&archive, &central_entries, dest.path());
    assert_eq!(results.len(), 1);
    assert!(results[0].1.is_err());
    assert!(!dest.path().parent().unwrap().join("escape.txt").exists());
}

#[test]
fn corrupted_entry_reports_checksum_error_but_others_still_extract() {
    let entries = [
        Entry { name: "good.txt", contents: b"fine" },
        Entry { name: "bad.txt", contents: b"also fine" },
    ];
    let mut archive = build_archive(&entries);

    let eocd = locate_eocd(&archive).unwrap();
    let bad_offset = {
        let central_entries = read_central_directory(&archive, &eocd).unwrap();
        central_entries[1].local_header_offset as usize
    };
    // flip a content byte in the second entry's local file data.
    let corrupt_at = bad_offset + 30 + "bad.txt".len();
    archive[corrupt_at] ^= 0xFF;

    let central_entries = read_central_directory(&archive, &eocd).unwrap();
    let dest = tempfile::tempdir().unwrap();
    let results = extract_all(&archive, &central_entries, dest.path());
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
    assert_eq!(fs::read(dest.path().join("good.txt")).unwrap(), b"fine");
}
