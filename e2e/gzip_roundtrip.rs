//! End-to-end GZIP decompression: known fixtures in, verified bytes out.

use unzipr::{gunzip, ExtractError};

const HELLO_WORLD_GZIP: [u8; 33] = [
    0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xF3, 0x48, 0xCD, 0xC9, 0xC9,
    0xD7, 0x51, 0x08, 0xCF, 0x2F, 0xCA, 0x49, 0x51, 0x04, 0x00, 0xD0, 0xC3, 0x4A, 0xEC, 0x0D,
    0x00, 0x00, 0x00,
];

#[test]
fn decompresses_hello_world() {
    let out = gunzip(&HELLO_WORLD_GZIP).expect("valid gzip member should decompress");
    assert_eq!(out, b"Hello, World!");
}

#[test]
fn corrupted_trailer_crc_is_rejected() {
    let mut data = HELLO_WORLD_GZIP;
    let crc_offset = data.len() - 8;
    data[crc_offset] ^= 0xFF;
    let err = gunzip(&data).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidChecksum { .. }));
}

#[test]
fn truncated_member_is_rejected() {
    let truncated = &HELLO_WORLD_GZIP[..15];
    assert!(gunzip(truncated).is_err());
}

#[test]
fn non_gzip_input_is_rejected() {
    let err = gunzip(b"this is not a gzip file at all").unwrap_err();
    assert!(matches!(err, ExtractError::InvalidMagic));
}
