//! Benchmarks for sealdrop-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sealdrop_crypto::{decrypt_attachment, digest, encrypt_attachment, envelope, KeyMaterial};

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for size in [1024, 64 * 1024, 1024 * 1024].iter() {
        let data = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("sha256", size), &data, |b, data| {
            b.iter(|| digest(data))
        });
    }

    group.finish();
}

fn bench_attachment(c: &mut Criterion) {
    let mut group = c.benchmark_group("attachment");

    for size in [1024, 64 * 1024, 1024 * 1024].iter() {
        let data = vec![0u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("encrypt", size), &data, |b, data| {
            b.iter(|| encrypt_attachment(data, "bench.bin", "application/octet-stream").unwrap())
        });

        let encrypted = encrypt_attachment(&data, "bench.bin", "application/octet-stream").unwrap();
        group.bench_with_input(
            BenchmarkId::new("decrypt", size),
            &encrypted,
            |b, encrypted| b.iter(|| decrypt_attachment(&encrypted.payload, &encrypted.material).unwrap()),
        );

        group.bench_with_input(BenchmarkId::new("envelope-encode", size), &data, |b, data| {
            b.iter(|| envelope::encode("bench.bin", "application/octet-stream", data).unwrap())
        });
    }

    group.finish();
}

fn bench_key_derivation(c: &mut Criterion) {
    let material = KeyMaterial::generate();
    c.bench_function("hkdf-sha256", |b| b.iter(|| material.derive_key().unwrap()));
}

criterion_group!(benches, bench_digest, bench_attachment, bench_key_derivation);
criterion_main!(benches);
