//! Treasury snapshots: capture the full ledger state so it can be persisted
//! and restored elsewhere.
//!
//! The snapshot carries the bincode-encoded state plus its SHA-256. The hash
//! only catches accidental corruption, so a restore also re-checks the ledger
//! invariants on the decoded state. Where the bytes are stored is up to the
//! caller.

use serde::{Deserialize, Serialize};

use crate::ledger::TreasuryState;
use crate::{Treasury, TreasuryConfig, TreasuryError};
use forge_crypto::sha256;
use forge_types::{Amount, BlockHeight};

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A point-in-time copy of a treasury.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasurySnapshot {
    /// SHA-256 of `state`.
    pub hash: [u8; 32],
    /// Ledger height when the snapshot was taken.
    pub block_height: BlockHeight,
    pub version: u32,
    /// bincode-encoded ledger state.
    pub state: Vec<u8>,
}

impl TreasurySnapshot {
    /// Verify the hash matches the state bytes.
    pub fn verify(&self) -> bool {
        self.version == SNAPSHOT_VERSION && self.hash == sha256(&self.state)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TreasuryError> {
        bincode::serialize(self).map_err(|e| TreasuryError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TreasuryError> {
        bincode::deserialize(bytes).map_err(|e| TreasuryError::Serialization(e.to_string()))
    }
}

impl Treasury {
    /// Capture the ledger state under the read lock.
    pub fn snapshot(&self) -> Result<TreasurySnapshot, TreasuryError> {
        let state = self.read();
        let bytes =
            bincode::serialize(&*state).map_err(|e| TreasuryError::Serialization(e.to_string()))?;
        Ok(TreasurySnapshot {
            hash: sha256(&bytes),
            block_height: state.current_height,
            version: SNAPSHOT_VERSION,
            state: bytes,
        })
    }

    /// Rebuild a treasury from a verified snapshot. Operation counters start
    /// from zero.
    pub fn restore(
        config: TreasuryConfig,
        snapshot: &TreasurySnapshot,
    ) -> Result<Self, TreasuryError> {
        config.validate()?;
        if !snapshot.verify() {
            return Err(TreasuryError::SnapshotCorrupt);
        }
        let state: TreasuryState = bincode::deserialize(&snapshot.state)
            .map_err(|e| TreasuryError::Serialization(e.to_string()))?;
        if state.current_height != snapshot.block_height {
            return Err(TreasuryError::SnapshotCorrupt);
        }
        check_consistency(&config, &state)?;
        Ok(Self::from_state(config, state))
    }
}

/// Reject decoded states no sequence of ledger operations could produce.
fn check_consistency(config: &TreasuryConfig, state: &TreasuryState) -> Result<(), TreasuryError> {
    let mut last_id = 0;
    let mut unspent = Amount::ZERO;
    for output in &state.outputs {
        if output.output_id <= last_id || output.output_id > state.next_output_id {
            return Err(TreasuryError::SnapshotCorrupt);
        }
        last_id = output.output_id;
        if !output.spent {
            unspent = unspent
                .checked_add(output.amount)
                .ok_or(TreasuryError::SnapshotCorrupt)?;
        }
    }
    if unspent != state.balance {
        return Err(TreasuryError::SnapshotCorrupt);
    }

    let mut claimed = Amount::ZERO;
    for amount in state.claims.values() {
        claimed = claimed
            .checked_add(*amount)
            .ok_or(TreasuryError::SnapshotCorrupt)?;
    }
    if claimed != state.total_rewards || state.total_rewards > config.max_supply {
        return Err(TreasuryError::SnapshotCorrupt);
    }
    Ok(())
}
