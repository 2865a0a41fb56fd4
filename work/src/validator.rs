//! Proof validation.

use crate::difficulty::hash_value;
use crate::{ForgeProof, Miner, WorkError};

/// Re-derive the hash for `proof.nonce` and check it against the target.
///
/// Proofs returned through the mining safety bound do not meet their target
/// and fail here.
pub fn validate_proof(miner: &Miner, data: &[u8], proof: &ForgeProof) -> Result<(), WorkError> {
    let hash = miner.hash_nonce(data, proof.nonce);
    if hash != proof.hash {
        return Err(WorkError::HashMismatch { nonce: proof.nonce });
    }
    let value = hash_value(&hash);
    if value >= proof.difficulty_target {
        return Err(WorkError::InsufficientDifficulty {
            value,
            target: proof.difficulty_target,
        });
    }
    Ok(())
}

/// Boolean form of [`validate_proof`].
pub fn verify_proof(miner: &Miner, data: &[u8], proof: &ForgeProof) -> bool {
    validate_proof(miner, data, proof).is_ok()
}
