//! Criterion benchmarks for the DEFLATE decoder.
//!
//! Run with:
//!   cargo bench --bench deflate
//!
//! There is no encoder in this crate, so inputs are synthetic stored
//! blocks (the cheapest legal DEFLATE encoding) built at a size large
//! enough to dominate per-call overhead.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use unzipr::bitreader::BitReader;
use unzipr::deflate::inflate;

/// Builds a DEFLATE stream of stored blocks (each capped at 65535 bytes,
/// the `LEN` field's width) covering `payload`.
fn stored_stream(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunks: Vec<&[u8]> = payload.chunks(0xFFFF).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }
    let last = chunks.len() - 1;
    for (i, chunk) in chunks.into_iter().enumerate() {
        let bfinal = if i == last { 1u8 } else { 0u8 };
        out.push(bfinal); // BFINAL in bit 0, BTYPE=00 in bits 1-2, rest padding
        let len = chunk.len() as u16;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(chunk);
    }
    out
}

fn bench_inflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("inflate_stored");

    for &size in &[64 * 1024usize, 1024 * 1024] {
        let payload: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        let stream = stored_stream(&payload);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("stored_blocks", size), &stream, |b, stream| {
            b.iter(|| {
                let mut output = Vec::with_capacity(size);
                let mut reader = BitReader::new(stream);
                inflate(&mut reader, &mut output).unwrap();
                output
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inflate);
criterion_main!(benches);
