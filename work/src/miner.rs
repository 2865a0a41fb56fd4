//! Sequential nonce search.

use tracing::{debug, info};

use crate::ForgeProof;
use crate::WorkError;
use forge_crypto::{Hpp1, TetraPow};
use forge_types::params::DEFAULT_MINING_SALT;
use forge_types::{ForgeParams, Hash32};

/// Nonce interval at which the search checks its safety bound.
pub const MINING_SAFETY_INTERVAL: u64 = 1_000_000;

/// Targets above this are treated as "accept anything" test targets: once
/// the search reaches a multiple of [`MINING_SAFETY_INTERVAL`] it returns the
/// current nonce even if it missed.
pub const MINING_SAFETY_TARGET: u64 = 0xFFFF_FFFF_FFFF_FF00;

/// Nonces between progress log lines.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Hashes nonces for a given HPP-1 configuration and salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Miner {
    hpp1: Hpp1,
    salt: Vec<u8>,
}

impl Miner {
    /// A miner using the protocol mining salt.
    pub fn new(hpp1: Hpp1) -> Self {
        Self {
            hpp1,
            salt: DEFAULT_MINING_SALT.as_bytes().to_vec(),
        }
    }

    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Build from protocol parameters (round count and mining salt).
    pub fn from_params(params: &ForgeParams) -> Result<Self, WorkError> {
        let hpp1 = Hpp1::new(params.hpp1_rounds)?;
        Ok(Self::new(hpp1).with_salt(params.mining_salt.as_bytes()))
    }

    pub fn hpp1(&self) -> &Hpp1 {
        &self.hpp1
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Digest for one nonce: `TetraPow(HPP-1(data ‖ nonce_le, salt, 32))`.
    pub fn hash_nonce(&self, data: &[u8], nonce: u64) -> Hash32 {
        let mut input = Vec::with_capacity(data.len() + 8);
        input.extend_from_slice(data);
        input.extend_from_slice(&nonce.to_le_bytes());
        self.hash_input(&mut input, nonce)
    }

    /// Same as [`hash_nonce`](Self::hash_nonce), reusing a buffer that already
    /// holds `data` followed by eight nonce bytes.
    pub(crate) fn hash_input(&self, input: &mut [u8], nonce: u64) -> Hash32 {
        let split = input.len() - 8;
        input[split..].copy_from_slice(&nonce.to_le_bytes());
        let mut seed = [0u8; 32];
        self.hpp1.stretch_into(input, &self.salt, &mut seed);
        Hash32::new(TetraPow::from_seed(&seed).compute())
    }

    /// Search nonces from zero until the hash value drops below `target`.
    ///
    /// Never fails. A target of 0 can never be met, so the search would not end.
    pub fn mine(&self, data: &[u8], target: u64) -> ForgeProof {
        self.mine_from(data, target, 0)
    }

    pub(crate) fn mine_from(&self, data: &[u8], target: u64, start: u64) -> ForgeProof {
        let mut input = Vec::with_capacity(data.len() + 8);
        input.extend_from_slice(data);
        input.extend_from_slice(&[0u8; 8]);

        let mut nonce = start;
        loop {
            let hash = self.hash_input(&mut input, nonce);
            let proof = ForgeProof {
                nonce,
                hash,
                difficulty_target: target,
            };

            if proof.meets_target() {
                info!(nonce, %hash, "forge proof found");
                return proof;
            }
            if hits_safety_bound(nonce, target) {
                debug!(nonce, target, "safety bound reached, returning unmet proof");
                return proof;
            }
            if nonce > 0 && nonce % PROGRESS_INTERVAL == 0 {
                debug!(nonce, "mining in progress");
            }

            nonce = nonce.wrapping_add(1);
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new(Hpp1::STANDARD)
    }
}

/// Whether the search should give up at `nonce` for this `target`.
pub(crate) fn hits_safety_bound(nonce: u64, target: u64) -> bool {
    nonce > 0 && nonce % MINING_SAFETY_INTERVAL == 0 && target > MINING_SAFETY_TARGET
}

/// Mine with the full-strength HPP-1 and the protocol mining salt.
pub fn mine(data: &[u8], target: u64) -> ForgeProof {
    Miner::default().mine(data, target)
}
