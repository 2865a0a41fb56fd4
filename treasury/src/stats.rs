//! Treasury reporting: stats, rune distribution, supply projections.

use serde::{Deserialize, Serialize};

use crate::{Treasury, TreasuryError};
use forge_types::{Amount, BlockHeight};
use forge_utils::stats::StatsSnapshot;

/// Rune allocation of minted supply, in basis points.
const RUNE_PROOF_OF_FORGE_BPS: u32 = 6_000;
const RUNE_TREASURY_BPS: u32 = 1_500;
const RUNE_LIQUIDITY_BPS: u32 = 2_000;
const RUNE_AIRDROP_BPS: u32 = 500;

/// Point-in-time treasury report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreasuryStats {
    pub current_height: BlockHeight,
    pub balance: Amount,
    pub spendable_balance: Amount,
    pub locked_balance: Amount,
    pub total_forged: u64,
    pub total_minted: Amount,
    pub total_rewards: Amount,
    pub total_fees_collected: Amount,
    pub fee_pool_sats: u64,
    pub next_forge_fee_sats: u64,
    pub outputs_total: usize,
    pub mini_outputs_total: usize,
    pub spendable_outputs: usize,
    pub locked_outputs: usize,
    pub spent_outputs: usize,
    pub mini_output_amount: Amount,
    pub block_interval: u32,
    pub forge_reward: Amount,
    pub supply_cap: Amount,
    pub percentage_minted: f64,
    pub distributions_count: usize,
    /// Operation counters since this process created the ledger.
    pub counters: StatsSnapshot,
}

impl TreasuryStats {
    pub fn to_json(&self) -> Result<String, TreasuryError> {
        serde_json::to_string_pretty(self).map_err(|e| TreasuryError::Serialization(e.to_string()))
    }
}

/// Split of minted supply across the rune allocation buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneDistribution {
    pub proof_of_forge: Amount,
    pub treasury: Amount,
    pub liquidity: Amount,
    pub airdrop: Amount,
    pub total_minted: Amount,
}

impl RuneDistribution {
    pub fn from_minted(total_minted: Amount) -> Self {
        Self {
            proof_of_forge: total_minted.share_bps(RUNE_PROOF_OF_FORGE_BPS),
            treasury: total_minted.share_bps(RUNE_TREASURY_BPS),
            liquidity: total_minted.share_bps(RUNE_LIQUIDITY_BPS),
            airdrop: total_minted.share_bps(RUNE_AIRDROP_BPS),
            total_minted,
        }
    }
}

/// Projection of when forging will exhaust the supply cap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplyEstimate {
    pub forges_remaining: u64,
    /// `None` when the forge rate is not positive.
    pub days: Option<f64>,
}

impl Treasury {
    /// Total reward of every forge processed so far.
    pub fn total_minted(&self) -> Amount {
        self.minted_after(self.read().total_forged)
    }

    fn minted_after(&self, forged: u64) -> Amount {
        self.config()
            .forge_reward
            .checked_mul(forged as u128)
            .unwrap_or(Amount::new(u128::MAX))
    }

    /// Every figure comes from one read guard.
    pub fn stats(&self) -> TreasuryStats {
        let config = self.config();
        let state = self.read();
        let total_minted = self.minted_after(state.total_forged);
        let height = state.current_height;

        let spendable_outputs = state.outputs.iter().filter(|o| o.is_spendable(height)).count();
        let locked_outputs = state.outputs.iter().filter(|o| o.is_locked(height)).count();
        let spent_outputs = state.outputs.iter().filter(|o| o.spent).count();
        let mini_outputs_total = state
            .outputs
            .iter()
            .filter(|o| o.kind == crate::OutputKind::Allocation)
            .count();

        let percentage_minted = if config.max_supply.is_zero() {
            0.0
        } else {
            total_minted.as_exs_f64() / config.max_supply.as_exs_f64() * 100.0
        };

        TreasuryStats {
            current_height: height,
            balance: state.balance,
            spendable_balance: state.spendable_balance(),
            locked_balance: state.locked_balance(),
            total_forged: state.total_forged,
            total_minted,
            total_rewards: state.total_rewards,
            total_fees_collected: state.total_fees_collected,
            fee_pool_sats: state.fee_pool_sats,
            next_forge_fee_sats: config.fee_schedule.fee_for(state.total_forged),
            outputs_total: state.outputs.len(),
            mini_outputs_total,
            spendable_outputs,
            locked_outputs,
            spent_outputs,
            mini_output_amount: config.mini_output_amount,
            block_interval: config.block_interval(),
            forge_reward: config.forge_reward,
            supply_cap: config.max_supply,
            percentage_minted,
            distributions_count: state.distributions.len(),
            counters: self.counters().snapshot(),
        }
    }

    pub fn rune_distribution(&self) -> RuneDistribution {
        RuneDistribution::from_minted(self.total_minted())
    }

    /// Forges left under the cap and, at `forges_per_day`, days until it is hit.
    pub fn estimate_time_to_supply_cap(&self, forges_per_day: f64) -> SupplyEstimate {
        let forged = self.read().total_forged;
        let forges_remaining = self.config().max_forges().saturating_sub(forged);
        let days = (forges_per_day.is_finite() && forges_per_day > 0.0)
            .then(|| forges_remaining as f64 / forges_per_day);
        SupplyEstimate {
            forges_remaining,
            days,
        }
    }
}
