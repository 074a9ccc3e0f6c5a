#![allow(dead_code)]

use hashledger_core::{Chain, ChainConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const GENESIS_TS: u64 = 1_700_000_000_000;

/// Difficulty 2 keeps each proof search in the hundreds of attempts.
pub fn fast_chain() -> Chain {
    Chain::with_config_at(ChainConfig::with_difficulty(2), GENESIS_TS)
}

pub fn txs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Deterministic pseudo-random transfer descriptions.
pub fn random_txs(rng: &mut StdRng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let from: u32 = rng.gen_range(0..100);
            let to: u32 = rng.gen_range(0..100);
            let amount: u64 = rng.gen_range(1..1_000);
            format!("user-{from} pays user-{to} {amount}")
        })
        .collect()
}

/// Chain with `blocks` appended blocks, one millisecond apart.
pub fn build_chain(blocks: usize, seed: u64) -> Chain {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chain = fast_chain();
    for i in 0..blocks {
        let count = rng.gen_range(0..5);
        let batch = random_txs(&mut rng, count);
        chain
            .append_block_at(batch, GENESIS_TS + 1 + i as u64)
            .expect("unbounded search never fails");
    }
    chain
}
