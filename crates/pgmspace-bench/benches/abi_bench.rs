//! C-ABI entry points over host memory standing in for flash.

use std::ffi::{c_char, c_void};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pgmspace_abi::string_abi::{memcpy_P, strlen_P, strncmp_P};

#[repr(C, align(4))]
struct Flash([u8; 1025]);

fn flash_text() -> Box<Flash> {
    let mut flash = Box::new(Flash([0; 1025]));
    for (i, b) in flash.0[..1024].iter_mut().enumerate() {
        *b = b'A' + (i % 26) as u8;
    }
    flash
}

fn bench_abi(c: &mut Criterion) {
    let flash = flash_text();
    let mut dest = vec![0u8; 1025];
    let mut group = c.benchmark_group("abi");

    for &size in &[16usize, 256, 1024] {
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("memcpy_P", size), &size, |b, &n| {
            b.iter(|| unsafe {
                black_box(memcpy_P(
                    dest.as_mut_ptr().cast::<c_void>(),
                    flash.0.as_ptr().cast::<c_void>(),
                    n,
                ))
            });
        });
    }

    group.bench_function("strlen_P/1024", |b| {
        b.iter(|| unsafe { black_box(strlen_P(flash.0.as_ptr().cast::<c_char>())) });
    });

    let ram = flash.0;
    group.bench_function("strncmp_P/1024", |b| {
        b.iter(|| unsafe {
            black_box(strncmp_P(
                ram.as_ptr().cast::<c_char>(),
                flash.0.as_ptr().cast::<c_char>(),
                1025,
            ))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_abi);
criterion_main!(benches);
