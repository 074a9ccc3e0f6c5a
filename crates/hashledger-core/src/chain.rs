use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::config::ChainConfig;
use crate::constants::{GENESIS_PROOF, GENESIS_TRANSACTION, SENTINEL_PREVIOUS_HASH};
use crate::error::{LedgerError, Result, ValidationError};
use crate::now_millis;
use crate::pow::ProofOfWork;
use crate::Block;

/// Ordered, hash-linked sequence of blocks. Never empty: the genesis block is created
/// with the chain and callers only ever see blocks through shared references.
#[derive(Clone, Debug, Serialize)]
pub struct Chain {
    config: ChainConfig,
    #[serde(skip)]
    pow: ProofOfWork,
    blocks: Vec<Block>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Self {
        Self::with_config_at(config, now_millis())
    }

    /// Same as [`Chain::with_config`] with a fixed genesis timestamp (milliseconds).
    pub fn with_config_at(config: ChainConfig, genesis_timestamp: u64) -> Self {
        let pow = ProofOfWork::from_config(&config);
        let mut chain = Self {
            config,
            pow,
            blocks: Vec::new(),
        };
        chain.create_genesis_block(genesis_timestamp);
        chain
    }

    fn create_genesis_block(&mut self, timestamp: u64) {
        let genesis = Block::new(
            0,
            SENTINEL_PREVIOUS_HASH,
            vec![GENESIS_TRANSACTION.to_string()],
            GENESIS_PROOF,
            Some(timestamp),
        );
        self.blocks.push(genesis);
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn last_block(&self) -> &Block {
        // Never empty once constructed.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Mines and appends a block holding `transactions`, stamped with the current time.
    /// Only fails when the config bounds proof-of-work attempts or asks for more leading
    /// zeros than a digest has.
    pub fn append_block(&mut self, transactions: Vec<String>) -> Result<&Block> {
        self.append_block_at(transactions, now_millis())
    }

    pub fn append_block_at(&mut self, transactions: Vec<String>, timestamp: u64) -> Result<&Block> {
        let last = self.last_block();
        let previous_hash = last.hash().to_string();
        let proof = self.pow.find(last.proof())?;
        let block = Block::new(
            self.blocks.len() as u64,
            previous_hash,
            transactions,
            proof,
            Some(timestamp),
        );
        info!(
            "Appended block {} with proof {} and hash {}",
            block.index(),
            proof,
            block.hash()
        );
        self.blocks.push(block);
        Ok(self.last_block())
    }

    /// Walks blocks 1..end checking each block's own hash, then its link to the predecessor.
    /// The genesis block is not checked, and a re-sealed last block has no successor to
    /// expose it.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let index = i + 1;
            check_hash(index, &pair[1])?;
            check_link(index, &pair[0], &pair[1])?;
        }
        Ok(())
    }

    pub fn is_chain_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Stricter audit on top of [`Chain::validate`]: also re-hashes the genesis block and
    /// checks every proof against its predecessor's.
    pub fn validate_strict(&self) -> std::result::Result<(), ValidationError> {
        check_hash(0, &self.blocks[0])?;
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let index = i + 1;
            let (previous, current) = (&pair[0], &pair[1]);
            check_hash(index, current)?;
            check_link(index, previous, current)?;
            if !self.pow.valid_proof(previous.proof(), current.proof()) {
                return Err(ValidationError::InvalidProof {
                    index,
                    last_proof: previous.proof(),
                    proof: current.proof(),
                });
            }
        }
        Ok(())
    }

    /// Simulated attack: rewrites a block's transactions and re-seals its hash without touching
    /// any `previous_hash`. Out-of-range indices are ignored.
    pub fn tamper_with_chain(&mut self, index: usize, new_transactions: Vec<String>) {
        if let Err(e) = self.try_tamper_with_chain(index, new_transactions) {
            warn!("Tamper ignored: {}", e);
        }
    }

    /// Like [`Chain::tamper_with_chain`] but reports an out-of-range index.
    pub fn try_tamper_with_chain(
        &mut self,
        index: usize,
        new_transactions: Vec<String>,
    ) -> Result<()> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        block.rewrite_transactions(new_transactions);
        warn!("Block {} tampered, new hash {}", index, block.hash());
        Ok(())
    }
}

fn check_hash(index: usize, block: &Block) -> std::result::Result<(), ValidationError> {
    let computed = block.compute_hash();
    if computed != block.hash() {
        return Err(ValidationError::HashMismatch {
            index,
            stored: block.hash().to_string(),
            computed,
        });
    }
    Ok(())
}

fn check_link(
    index: usize,
    previous: &Block,
    current: &Block,
) -> std::result::Result<(), ValidationError> {
    if current.previous_hash() != previous.hash() {
        return Err(ValidationError::BrokenLink {
            index,
            expected: previous.hash().to_string(),
            found: current.previous_hash().to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{block}")?;
            writeln!(f, "{}", "-".repeat(50))?;
        }
        Ok(())
    }
}
