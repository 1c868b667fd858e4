//! Word-parallel routines against the byte-at-a-time reference.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pgmspace_core::string::{memcpy_p, strncpy_p, strnlen_p};
use pgmspace_core::{ESP8266_REGION_BASE, RegionImage, SIZE_IRRELEVANT, reference};

const BASE: usize = ESP8266_REGION_BASE;
const SIZES: &[usize] = &[16, 64, 256, 1024, 4096];

#[repr(C, align(4))]
struct Scratch([u8; 4096]);

fn text(len: usize) -> Vec<u8> {
    let mut s: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
    s.push(0);
    s
}

fn bench_memcpy(c: &mut Criterion) {
    let mut group = c.benchmark_group("memcpy_P");
    let mut dest = Box::new(Scratch([0; 4096]));

    for &size in SIZES {
        let flash = RegionImage::from_bytes(BASE, 0, &text(size));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("word", size), &size, |b, &n| {
            b.iter(|| black_box(memcpy_p(&flash, &mut dest.0[..n], black_box(BASE), n)));
        });
        group.bench_with_input(BenchmarkId::new("reference", size), &size, |b, &n| {
            b.iter(|| black_box(reference::memcpy(&flash, &mut dest.0[..n], black_box(BASE), n)));
        });
        // Misaligned source falls back to byte reads.
        let shifted = RegionImage::from_bytes(BASE, 1, &text(size));
        group.bench_with_input(BenchmarkId::new("word_misaligned", size), &size, |b, &n| {
            b.iter(|| black_box(memcpy_p(&shifted, &mut dest.0[..n], black_box(BASE + 1), n)));
        });
    }
    group.finish();
}

fn bench_strnlen(c: &mut Criterion) {
    let mut group = c.benchmark_group("strnlen_P");

    for &size in SIZES {
        let flash = RegionImage::from_bytes(BASE, 0, &text(size));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("word", size), &size, |b, _| {
            b.iter(|| black_box(strnlen_p(&flash, black_box(BASE), SIZE_IRRELEVANT)));
        });
        group.bench_with_input(BenchmarkId::new("reference", size), &size, |b, _| {
            b.iter(|| black_box(reference::strnlen(&flash, black_box(BASE), SIZE_IRRELEVANT)));
        });
    }
    group.finish();
}

fn bench_strncpy(c: &mut Criterion) {
    let mut group = c.benchmark_group("strncpy_P");
    let mut dest = Box::new(Scratch([0; 4096]));

    for &size in SIZES {
        let flash = RegionImage::from_bytes(BASE, 0, &text(size - 1));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("word", size), &size, |b, &n| {
            b.iter(|| black_box(strncpy_p(&flash, &mut dest.0[..n], black_box(BASE), n)));
        });
        group.bench_with_input(BenchmarkId::new("reference", size), &size, |b, &n| {
            b.iter(|| black_box(reference::strncpy(&flash, &mut dest.0[..n], black_box(BASE), n)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_memcpy, bench_strnlen, bench_strncpy);
criterion_main!(benches);
