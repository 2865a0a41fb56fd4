//! Treasury outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use forge_script::{build_script, ScriptError, TimeLockScript};
use forge_types::{Amount, BlockHeight};
use forge_utils::format_height_delay;

/// Monotonic output identifier, starting at 1.
pub type OutputId = u64;

/// Where an output's funds came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// One of the time-locked shares of a forge's treasury allocation.
    Allocation,
    /// King's Tithe taken from a miner reward.
    Tithe,
    /// Treasury fee on a minted amount.
    Fee,
    /// Remainder returned by a distribution.
    Change,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Allocation => "allocation",
            Self::Tithe => "tithe",
            Self::Fee => "fee",
            Self::Change => "change",
        };
        f.write_str(name)
    }
}

/// A treasury output with an unlock height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniOutput {
    pub output_id: OutputId,
    pub kind: OutputKind,
    /// Forge that created this output, if any.
    pub forge_id: Option<u64>,
    pub created_at_height: BlockHeight,
    pub amount: Amount,
    pub unlock_height: BlockHeight,
    pub spent: bool,
}

impl MiniOutput {
    /// Unspent and unlocked at `current_height`.
    pub fn is_spendable(&self, current_height: BlockHeight) -> bool {
        !self.spent && current_height.has_reached(self.unlock_height)
    }

    /// Unspent but still time-locked at `current_height`.
    pub fn is_locked(&self, current_height: BlockHeight) -> bool {
        !self.spent && !current_height.has_reached(self.unlock_height)
    }

    /// CLTV script paying this output to `recipient_hash` once it unlocks.
    ///
    /// Fails with [`ScriptError::InvalidLockHeight`] for outputs that unlock
    /// at height 0, which need no time-lock.
    pub fn lock_script(&self, recipient_hash: &[u8]) -> Result<TimeLockScript, ScriptError> {
        build_script(self.unlock_height.get(), recipient_hash)
    }

    /// Approximate wait until unlock, e.g. `"30d 0h"`.
    pub fn unlocks_in(&self, current_height: BlockHeight) -> String {
        format_height_delay(current_height, self.unlock_height)
    }
}
