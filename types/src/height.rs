//! Chain height type used for absolute time locks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute block height.
///
/// Heights are 32-bit to match the lock-time field of CLTV scripts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u32);

impl BlockHeight {
    pub const GENESIS: Self = Self(0);

    pub const fn new(height: u32) -> Self {
        Self(height)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Height reached after `delay` more blocks (saturating at `u32::MAX`).
    pub fn after(&self, delay: u32) -> Self {
        Self(self.0.saturating_add(delay))
    }

    /// Whether a lock at `unlock` has been reached from this height.
    pub fn has_reached(&self, unlock: BlockHeight) -> bool {
        self.0 >= unlock.0
    }

    /// Blocks remaining until `unlock` (zero once reached).
    pub fn blocks_until(&self, unlock: BlockHeight) -> u32 {
        unlock.0.saturating_sub(self.0)
    }
}

impl From<u32> for BlockHeight {
    fn from(h: u32) -> Self {
        Self(h)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
