use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relief_crypto::{Argon2PinHasher, HashParams, PinHasher};
use relief_types::Pin;

fn argon2_hash_bench(c: &mut Criterion) {
    let hasher = Argon2PinHasher::new(HashParams::default());
    let pin = Pin::parse("123456").unwrap();

    c.bench_function("argon2id_hash_pin_default", |b| {
        b.iter(|| hasher.hash_pin(black_box(&pin)))
    });
}

fn argon2_verify_bench(c: &mut Criterion) {
    let hasher = Argon2PinHasher::new(HashParams::default());
    let pin = Pin::parse("123456").unwrap();
    let hash = hasher.hash_pin(&pin).unwrap();

    c.bench_function("argon2id_verify_pin_default", |b| {
        b.iter(|| hasher.verify_pin(black_box(&pin), &hash))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = argon2_hash_bench, argon2_verify_bench
}
criterion_main!(benches);
