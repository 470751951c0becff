//! Performance benchmarks for boardarc-lzss
//!
//! Measures encode and decode throughput over a few data patterns typical
//! of board model and animation blobs.

use boardarc_lzss::{compress, decompress};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    /// All zero - matches straight out of the initial window
    pub fn zeros(size: usize) -> Vec<u8> {
        vec![0; size]
    }

    /// Pseudo-random bytes, almost no matches
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x0BAD_5EED_1234_5678;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Big-endian float tables, like vertex buffers
    pub fn vertices(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut i = 0u32;
        while data.len() < size {
            let value = (i % 64) as f32 * 0.25;
            data.extend_from_slice(&value.to_be_bytes());
            i += 1;
        }
        data.truncate(size);
        data
    }

    /// Repeated ASCII text
    pub fn text(size: usize) -> Vec<u8> {
        let text = b"Hop on the blue space to collect three coins. \
                     Land on the red space and lose three coins. ";
        text.iter().copied().cycle().take(size).collect()
    }
}

const SIZE: usize = 16 * 1024;

fn patterns() -> [(&'static str, PatternGenerator); 4] {
    [
        ("zeros", test_data::zeros as PatternGenerator),
        ("random", test_data::random as PatternGenerator),
        ("vertices", test_data::vertices as PatternGenerator),
        ("text", test_data::text as PatternGenerator),
    ]
}

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzss_compress");

    for (name, generator) in patterns() {
        let data = generator(SIZE);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(compress(black_box(data)).unwrap()));
        });
    }

    group.finish();
}

fn bench_decompression(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzss_decompress");

    for (name, generator) in patterns() {
        let compressed = compress(&generator(SIZE)).unwrap();
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &compressed,
            |b, compressed| {
                b.iter(|| black_box(decompress(black_box(compressed), SIZE).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compression, bench_decompression);
criterion_main!(benches);
