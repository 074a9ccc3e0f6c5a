pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const POW_DIFFICULTY: usize = 4;
pub const SENTINEL_PREVIOUS_HASH: &str = "0";
pub const GENESIS_PROOF: u64 = 100;
pub const GENESIS_TRANSACTION: &str = "Genesis Block";
