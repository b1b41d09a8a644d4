use criterion::{criterion_group, BatchSize, Criterion};
use newchain_signing_key::SigningKey;
use rand::thread_rng;
use std::hint::black_box;

fn benchmark_compute_shared_secret(c: &mut Criterion) {
    c.bench_function(module_path!(), |b| {
        b.iter_batched(
            || {
                let mut rng = thread_rng();
                let signer = SigningKey::random(&mut rng);
                let peer = SigningKey::random(&mut rng).compressed_public_key_bytes();
                (signer, peer)
            },
            |(signer, peer)| {
                black_box(signer.compute_shared_secret(&peer).unwrap());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_compute_shared_secret);
