//! Performance benchmarks for boardarc-archive
//!
//! Saves and reloads a board archive with one entry per codec. Build with
//! `--features parallel` to compare against the rayon paths.

use boardarc_archive::{BinArchive, PacArchive, PacEntry};
use boardarc_core::CompressionType;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const ENTRY_SIZE: usize = 32 * 1024;

const CODECS: [CompressionType; 5] = [
    CompressionType::None,
    CompressionType::Lzss,
    CompressionType::Slide,
    CompressionType::Flide,
    CompressionType::Inflate,
];

/// Vertex-like float tables with some repetition
fn entry_data(seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(ENTRY_SIZE);
    let mut i = seed;
    while data.len() < ENTRY_SIZE {
        let value = (i % 96) as f32 * 0.125;
        data.extend_from_slice(&value.to_be_bytes());
        i = i.wrapping_add(1);
    }
    data
}

fn bin_archive(entries: usize) -> BinArchive {
    let mut archive = BinArchive::new("bench.bin");
    for i in 0..entries {
        archive.add_entry_with_compression(CODECS[i % CODECS.len()], entry_data(i as u32));
    }
    archive
}

fn bench_bin(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_archive");
    group.sample_size(20);

    for entries in [5, 20] {
        let archive = bin_archive(entries);
        let bytes = archive.to_bytes().unwrap();
        group.throughput(Throughput::Bytes((entries * ENTRY_SIZE) as u64));

        group.bench_with_input(BenchmarkId::new("save", entries), &archive, |b, archive| {
            b.iter(|| black_box(archive.to_bytes().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("read", entries), &bytes, |b, bytes| {
            b.iter(|| black_box(BinArchive::read(black_box(bytes), "bench.bin").unwrap()));
        });
    }

    group.finish();
}

fn bench_pac(c: &mut Criterion) {
    let mut group = c.benchmark_group("pac_archive");

    let mut pac = PacArchive::new();
    for i in 0..8 {
        pac.add_entry(PacEntry::new(&format!("file{}", i), "bin", entry_data(i), i % 2 == 0));
    }
    let bytes = pac.to_bytes().unwrap();
    group.throughput(Throughput::Bytes((8 * ENTRY_SIZE) as u64));

    group.bench_function("save", |b| b.iter(|| black_box(pac.to_bytes().unwrap())));
    group.bench_function("read", |b| {
        b.iter(|| black_box(PacArchive::read(black_box(&bytes)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_bin, bench_pac);
criterion_main!(benches);
