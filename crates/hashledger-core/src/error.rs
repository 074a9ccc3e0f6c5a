use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("proof-of-work exhausted after {attempts} attempts (last proof {last_proof})")]
    ProofOfWorkExhausted { last_proof: u64, attempts: u64 },

    #[error("block index {index} out of range (chain length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("difficulty {difficulty} exceeds the {max} hex characters of a digest")]
    InvalidDifficulty { difficulty: usize, max: usize },
}

/// First violation found while walking the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index}: stored hash {stored} does not match recomputed {computed}")]
    HashMismatch {
        index: usize,
        stored: String,
        computed: String,
    },

    #[error("block {index}: previous_hash {found} does not match predecessor hash {expected}")]
    BrokenLink {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("block {index}: proof {proof} does not solve the puzzle for last proof {last_proof}")]
    InvalidProof {
        index: usize,
        last_proof: u64,
        proof: u64,
    },
}

impl ValidationError {
    pub fn index(&self) -> usize {
        match self {
            ValidationError::HashMismatch { index, .. }
            | ValidationError::BrokenLink { index, .. }
            | ValidationError::InvalidProof { index, .. } => *index,
        }
    }
}
