//! Tetra-PoW mining.
//!
//! A nonce is valid when the Tetra-PoW digest of `HPP-1(data ‖ nonce_le)`,
//! read as a little-endian `u64` over its first eight bytes, falls below the
//! target. Every attempt pays a full HPP-1 stretch, so the search is memory-light
//! but deliberately slow per nonce.

pub mod difficulty;
pub mod error;
pub mod generator;
pub mod miner;
pub mod validator;

use serde::{Deserialize, Serialize};

use forge_types::Hash32;

pub use difficulty::{expected_attempts, hash_value, meets_leading_zero_bytes, meets_target};
pub use error::WorkError;
pub use generator::WorkGenerator;
pub use miner::{mine, Miner, MINING_SAFETY_INTERVAL, MINING_SAFETY_TARGET};
pub use validator::{validate_proof, verify_proof};

/// The result of a nonce search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeProof {
    pub nonce: u64,
    pub hash: Hash32,
    pub difficulty_target: u64,
}

impl ForgeProof {
    /// Whether the hash value is below the target it was mined for.
    pub fn meets_target(&self) -> bool {
        meets_target(&self.hash, self.difficulty_target)
    }
}
