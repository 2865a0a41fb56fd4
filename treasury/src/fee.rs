//! Forge fee schedule.
//!
//! The fee starts at 1 BTC, rises by 0.1 BTC every 10,000 forges and is
//! capped at 21 BTC.

use serde::{Deserialize, Serialize};

use forge_types::ForgeParams;

/// Step schedule for the BTC forge fee, in satoshis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_sats: u64,
    pub increment_sats: u64,
    pub increment_interval: u64,
    pub max_sats: u64,
}

impl FeeSchedule {
    pub const CANONICAL: Self = Self {
        base_sats: 100_000_000,
        increment_sats: 10_000_000,
        increment_interval: 10_000,
        max_sats: 2_100_000_000,
    };

    pub fn from_params(params: &ForgeParams) -> Self {
        Self {
            base_sats: params.fee_base_sats,
            increment_sats: params.fee_increment_sats,
            increment_interval: params.fee_increment_interval,
            max_sats: params.fee_max_sats,
        }
    }

    /// Fee after `total_forges` forges have completed.
    pub fn fee_for(&self, total_forges: u64) -> u64 {
        let steps = total_forges
            .checked_div(self.increment_interval)
            .unwrap_or(0);
        self.base_sats
            .saturating_add(steps.saturating_mul(self.increment_sats))
            .min(self.max_sats)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Canonical forge fee after `total_forges` forges.
pub fn forge_fee(total_forges: u64) -> u64 {
    FeeSchedule::CANONICAL.fee_for(total_forges)
}
