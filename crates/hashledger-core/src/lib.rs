use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod chain;
pub mod config;
pub mod constants;
pub mod error;

pub use chain::Chain;
pub use config::ChainConfig;
pub use error::{LedgerError, Result, ValidationError};
pub use pow::ProofOfWork;

/// Lowercase hex SHA-256 digest, or the genesis sentinel.
pub type Hash = String;

/// Milliseconds since the Unix epoch. A clock set before 1970 reads as 0.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

pub fn sha256_hex(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// One ledger entry. Fields are fixed at construction; `hash` always covers the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: u64,
    transactions: Vec<String>,
    previous_hash: Hash,
    proof: u64,
    hash: Hash,
}

impl Block {
    /// Builds a block and computes its hash. `timestamp` is in milliseconds; `None` reads the clock.
    pub fn new(
        index: u64,
        previous_hash: impl Into<Hash>,
        transactions: Vec<String>,
        proof: u64,
        timestamp: Option<u64>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp: timestamp.unwrap_or_else(now_millis),
            transactions,
            previous_hash: previous_hash.into(),
            proof,
            hash: Hash::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[String] {
        &self.transactions
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn proof(&self) -> u64 {
        self.proof
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Canonical byte form of every field but `hash`. Variable-length fields carry a
    /// u64 LE length prefix so distinct field tuples never serialize identically.
    pub fn hash_bytes(&self) -> Vec<u8> {
        let tx_len: usize = self.transactions.iter().map(|t| 8 + t.len()).sum();
        let mut bytes = Vec::with_capacity(8 + 8 + 8 + tx_len + 8 + self.previous_hash.len() + 8);
        bytes.extend_from_slice(&self.index.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&(self.transactions.len() as u64).to_le_bytes());
        for tx in &self.transactions {
            push_prefixed(&mut bytes, tx.as_bytes());
        }
        push_prefixed(&mut bytes, self.previous_hash.as_bytes());
        bytes.extend_from_slice(&self.proof.to_le_bytes());
        bytes
    }

    pub fn compute_hash(&self) -> Hash {
        sha256_hex(&self.hash_bytes())
    }

    /// Stored hash still matches the current field values.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Overwrites the transactions and re-seals the block. Only used to simulate an attack.
    pub(crate) fn rewrite_transactions(&mut self, transactions: Vec<String>) {
        self.transactions = transactions;
        self.hash = self.compute_hash();
    }
}

fn push_prefixed(bytes: &mut Vec<u8>, field: &[u8]) {
    bytes.extend_from_slice(&(field.len() as u64).to_le_bytes());
    bytes.extend_from_slice(field);
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block {} [Timestamp: {}]", self.index, self.timestamp)?;
        writeln!(f, "Previous Hash: {}", self.previous_hash)?;
        writeln!(f, "Transactions: {:?}", self.transactions)?;
        writeln!(f, "Proof: {}", self.proof)?;
        write!(f, "Hash: {}", self.hash)
    }
}

pub mod pow {
    use super::sha256_hex;
    use crate::config::ChainConfig;
    use crate::constants::HASH_HEX_SIZE;
    use crate::error::{LedgerError, Result};
    use tracing::debug;

    /// Digest of the two proofs concatenated as decimal strings.
    pub fn proof_digest(last_proof: u64, proof: u64) -> String {
        sha256_hex(format!("{last_proof}{proof}").as_bytes())
    }

    pub fn leading_zero_hex_chars(hex: &str) -> usize {
        hex.bytes().take_while(|b| *b == b'0').count()
    }

    pub fn valid_proof(last_proof: u64, proof: u64, difficulty: usize) -> bool {
        leading_zero_hex_chars(&proof_digest(last_proof, proof)) >= difficulty
    }

    /// Sequential proof search. Without `max_attempts` the loop only ends on a hit,
    /// which for difficulty 4 takes about 16^4 attempts on average.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ProofOfWork {
        difficulty: usize,
        max_attempts: Option<u64>,
    }

    impl ProofOfWork {
        pub fn new(difficulty: usize) -> Self {
            Self {
                difficulty,
                max_attempts: None,
            }
        }

        pub fn from_config(config: &ChainConfig) -> Self {
            Self {
                difficulty: config.difficulty,
                max_attempts: config.max_attempts,
            }
        }

        pub fn difficulty(&self) -> usize {
            self.difficulty
        }

        pub fn max_attempts(&self) -> Option<u64> {
            self.max_attempts
        }

        pub fn valid_proof(&self, last_proof: u64, proof: u64) -> bool {
            valid_proof(last_proof, proof, self.difficulty)
        }

        /// Fails when no digest can carry `difficulty` leading zeros.
        pub fn check_difficulty(&self) -> Result<()> {
            if self.difficulty > HASH_HEX_SIZE {
                return Err(LedgerError::InvalidDifficulty {
                    difficulty: self.difficulty,
                    max: HASH_HEX_SIZE,
                });
            }
            Ok(())
        }

        /// Returns the smallest proof, counting up from 0, that solves the puzzle for `last_proof`.
        pub fn find(&self, last_proof: u64) -> Result<u64> {
            self.check_difficulty()?;
            let mut proof = 0u64;
            let mut attempts = 0u64;
            loop {
                if self.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(LedgerError::ProofOfWorkExhausted {
                        last_proof,
                        attempts,
                    });
                }
                attempts += 1;
                if self.valid_proof(last_proof, proof) {
                    debug!(
                        "Found proof {} for last proof {} after {} attempts",
                        proof, last_proof, attempts
                    );
                    return Ok(proof);
                }
                proof = proof.wrapping_add(1);
            }
        }
    }

    impl Default for ProofOfWork {
        fn default() -> Self {
            Self::from_config(&ChainConfig::default())
        }
    }
}
