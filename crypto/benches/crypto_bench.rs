use criterion::{black_box, criterion_group, criterion_main, Criterion};

use forge_crypto::{Hpp1, CANONICAL_PROPHECY};
use forge_types::Network;

fn sha512_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("sha512_256B", |b| {
        b.iter(|| forge_crypto::sha512(black_box(&data)))
    });
}

fn tetra_pow_bench(c: &mut Criterion) {
    let seed = [0x5Au8; 32];

    c.bench_function("tetra_pow_128_rounds", |b| {
        b.iter(|| forge_crypto::tetra_pow(black_box(&seed)))
    });
}

fn zetahash_bench(c: &mut Criterion) {
    let tempered = [0x3Cu8; 64];

    c.bench_function("zetahash_64B", |b| {
        b.iter(|| forge_crypto::zetahash(black_box(&tempered)))
    });
}

fn hpp1_1k_bench(c: &mut Criterion) {
    let hpp1 = Hpp1::new(1_000).unwrap();
    let secret = [7u8; 32];

    c.bench_function("hpp1_1000_rounds", |b| {
        b.iter(|| hpp1.stretch(black_box(&secret), b"bench-salt", 64))
    });
}

fn taproot_tweak_bench(c: &mut Criterion) {
    let internal = forge_crypto::internal_key_from_entropy(&[9u8; 32]).unwrap();
    let commitment = [1u8; 32];

    c.bench_function("taproot_tweak", |b| {
        b.iter(|| forge_crypto::tweak_internal_key(black_box(&internal), &commitment))
    });
}

fn derive_vault_fast_bench(c: &mut Criterion) {
    let hpp1 = Hpp1::new(1_000).unwrap();

    c.bench_function("derive_vault_1000_rounds", |b| {
        b.iter(|| {
            forge_crypto::derive_vault_with(
                black_box(&CANONICAL_PROPHECY),
                None,
                Network::Mainnet,
                &hpp1,
            )
        })
    });
}

fn derive_vault_standard_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_vault_standard");
    group.sample_size(10);
    group.bench_function("600k_rounds", |b| {
        b.iter(|| forge_crypto::derive_vault(black_box(&CANONICAL_PROPHECY), None, Network::Mainnet))
    });
    group.finish();
}

criterion_group!(
    benches,
    sha512_bench,
    tetra_pow_bench,
    zetahash_bench,
    hpp1_1k_bench,
    taproot_tweak_bench,
    derive_vault_fast_bench,
    derive_vault_standard_bench,
);
criterion_main!(benches);
