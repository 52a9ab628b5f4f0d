//! End-to-end CLI behavior: invokes the built `unzipr` binary as a
//! subprocess against a synthetic archive on disk.

use std::fs;
use std::process::Command;

use unzipr::crc32::crc32_scalar;

const LOCAL_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const CENTRAL_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

fn write_single_entry_archive(path: &std::path::Path, name: &str, contents: &[u8]) {
    let crc = crc32_scalar(contents);
    let mut data = Vec::new();

    data.extend_from_slice(&LOCAL_SIGNATURE);
    data.extend_from_slice(&20u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&crc.to_le_bytes());
    data.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    data.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    data.extend_from_slice(&(name.len() as u16).to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(name.as_bytes());
    data.extend_from_slice(contents);

    let cd_offset = data.len() as u32;
    let mut central = Vec::new();
    central.extend_from_slice(&CENTRAL_SIGNATURE);
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&20u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&crc.to_le_bytes());
    central.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    central.extend_from_slice(&(contents.len() as u32).to_le_bytes());
    central.extend_from_slice(&(name.len() as u16).to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u16.to_le_bytes());
    central.extend_from_slice(&0u32.to_le_bytes());
    central.extend_from_slice(&0u32.to_le_bytes());
    central.extend_from_slice(name.as_bytes());
    let cd_size = central.len() as u32;
    data.extend_from_slice(&central);

    data.extend_from_slice(&EOCD_SIGNATURE);
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&cd_size.to_le_bytes());
    data.extend_from_slice(&cd_offset.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());

    fs::write(path, data).unwrap();
}

fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_unzipr")
}

#[test]
fn extracts_to_destination_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("archive.zip");
    write_single_entry_archive(&archive_path, "hi.txt", b"hi\n");
    let dest = dir.path().join("out");

    let status = Command::new(binary())
        .arg(&archive_path)
        .arg(&dest)
        .status()
        .expect("unzipr should run");

    assert!(status.success());
    assert_eq!(fs::read(dest.join("hi.txt")).unwrap(), b"hi\n");
}

#[test]
fn without_destination_validates_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("archive.zip");
    write_single_entry_archive(&archive_path, "hi.txt", b"hi\n");

    let status = Command::new(binary()).arg(&archive_path).status().expect("unzipr should run");

    assert!(status.success());
    assert!(!dir.path().join("hi.txt").exists());
}

#[test]
fn nonexistent_archive_exits_nonzero_with_stderr_message() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.zip");

    let output = Command::new(binary()).arg(&missing).output().expect("unzipr should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"));
}

#[test]
fn verbose_flag_raises_output_detail() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("archive.zip");
    write_single_entry_archive(&archive_path, "hi.txt", b"hi\n");
    let dest = dir.path().join("out");

    let output = Command::new(binary())
        .arg(&archive_path)
        .arg(&dest)
        .arg("-vv")
        .output()
        .expect("unzipr should run");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("entries found"));
}
