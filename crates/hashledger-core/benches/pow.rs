use criterion::{criterion_group, criterion_main, Criterion};
use hashledger_core::{Chain, ChainConfig, ProofOfWork};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

fn bench_pow(c: &mut Criterion) {
    c.bench_function("find_proof_difficulty_4", |b| {
        let work = ProofOfWork::new(4);
        b.iter(|| work.find(black_box(100)));
    });

    c.bench_function("append_and_validate_difficulty_2", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let txs: Vec<String> = (0..10)
            .map(|i| format!("alice-{i} pays bob {}", rng.gen_range(1..10)))
            .collect();

        b.iter(|| {
            let mut chain = Chain::with_config_at(ChainConfig::with_difficulty(2), 0);
            for ts in 1..=5 {
                let _ = chain.append_block_at(txs.clone(), ts);
            }
            black_box(chain.is_chain_valid())
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
