use serde::{Deserialize, Serialize};

use crate::constants::POW_DIFFICULTY;

/// Settings fixed for the lifetime of a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Required number of leading `'0'` hex characters in a proof digest.
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
    /// Upper bound on proof-of-work attempts. `None` searches until a proof is found.
    #[serde(default)]
    pub max_attempts: Option<u64>,
}

fn default_difficulty() -> usize {
    POW_DIFFICULTY
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            max_attempts: None,
        }
    }
}

impl ChainConfig {
    pub fn with_difficulty(difficulty: usize) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}
