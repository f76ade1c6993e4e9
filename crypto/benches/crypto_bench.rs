use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vow_types::Identity;

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| vow_crypto::blake2b_256(black_box(&data)))
    });
}

fn hash_to_field_bench(c: &mut Criterion) {
    let data = [0xCDu8; 20];

    c.bench_function("hash_to_field_20B", |b| {
        b.iter(|| vow_crypto::hash_to_field(black_box(&data)))
    });
}

fn pair_key_bench(c: &mut Criterion) {
    let a = Identity::from_low_u64(42);
    let z = Identity::from_low_u64(7);

    c.bench_function("pair_key", |b| {
        b.iter(|| vow_crypto::pair_key(black_box(&a), black_box(&z)))
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    hash_to_field_bench,
    pair_key_bench
);
criterion_main!(benches);
