//! Criterion benchmarks for whole-archive ZIP extraction.
//!
//! Run with:
//!   cargo bench --bench zip_extract

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use unzipr::crc32::crc32_scalar;
use unzipr::zip::{locate_eocd, CentralDirectoryEntry};

const LOCAL_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const CENTRAL_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Builds a synthetic ZIP archive with `count` STORED entries of `entry_size`
/// bytes each, returning the archive bytes.
fn synthetic_archive(count: usize, entry_size: usize) -> Vec<u8> {
    let mut data = Vec::new();
    let mut central = Vec::new();
    let mut offsets = Vec::with_capacity(count);

    for i in 0..count {
        let name = format!("file_{i:04}.bin");
        let contents: Vec<u8> = (0..entry_size).map(|b| ((b + i) % 251) as u8).collect();
        let crc = crc32_scalar(&contents);

        offsets.push(data.len() as u32);
        data.extend_from_slice(&LOCAL_SIGNATURE);
        data.extend_from_slice(&20u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // STORED
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&crc.to_le_bytes());
        data.extend_from_slice(&(contents.len() as u32).to_le_bytes());
        data.extend_from_slice(&(contents.len() as u32).to_le_bytes());
        data.extend_from_slice(&(name.len() as u16).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(&contents);

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
        central.extend_from_slice(&offsets[i].to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let cd_offset = data.len() as u32;
    let cd_size = central.len() as u32;
    data.extend_from_slice(&central);

    data.extend_from_slice(&EOCD_SIGNATURE);
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&(count as u16).to_le_bytes());
    data.extend_from_slice(&(count as u16).to_le_bytes());
    data.extend_from_slice(&cd_size.to_le_bytes());
    data.extend_from_slice(&cd_offset.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());

    data
}

fn bench_extract_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("zip_extract_all");

    for &(count, entry_size) in &[(16usize, 4096usize), (256, 1024)] {
        let archive = synthetic_archive(count, entry_size);
        let total_bytes = (count * entry_size) as u64;
        let dest = std::env::temp_dir().join("unzipr-bench-extract");

        group.throughput(Throughput::Bytes(total_bytes));
        group.bench_with_input(
            BenchmarkId::new("extract_all", format!("{count}x{entry_size}")),
            &archive,
            |b, archive| {
                b.iter(|| {
                    let eocd = locate_eocd(archive).unwrap();
                    let entries: Vec<CentralDirectoryEntry<'_>> =
                        unzipr::zip::central::read_central_directory(archive, &eocd).unwrap();
                    unzipr::zip::extract_all(archive, &entries, &dest)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extract_all);
criterion_main!(benches);
