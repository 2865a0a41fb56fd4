//! The treasury ledger.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::address::validate_recipient;
use crate::output::{MiniOutput, OutputId, OutputKind};
use crate::{TreasuryConfig, TreasuryError};
use forge_types::{Amount, BlockHeight, ForgeParams, Hash32};
use forge_utils::StatsCounter;
use forge_work::meets_leading_zero_bytes;

pub(crate) const COUNTER_NAMES: &[&str] = &[
    "forges",
    "tithes",
    "claims",
    "claims_rejected",
    "distributions",
    "outputs_spent",
    "fees_collected",
];

/// Outcome of one processed forge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeResult {
    pub forge_id: u64,
    pub recipient: String,
    pub total_reward: Amount,
    /// Miner share after the treasury allocation and any tithe.
    pub miner_reward: Amount,
    pub treasury_allocation: Amount,
    pub kings_tithe: Amount,
    pub mini_outputs: Vec<MiniOutput>,
    pub tithe_output: Option<MiniOutput>,
    pub block_height: BlockHeight,
    /// BTC forge fee in force for this forge.
    pub forge_fee_sats: u64,
}

/// A payment out of the treasury.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: u64,
    pub block_height: BlockHeight,
    pub amount: Amount,
    pub recipient: String,
    pub purpose: String,
    /// Outputs consumed to fund this distribution, oldest first.
    pub consumed_outputs: Vec<OutputId>,
    pub change_output: Option<OutputId>,
}

/// A recorded reward claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub recipient: String,
    pub amount: Amount,
    /// Everything this recipient has claimed so far, including this claim.
    pub recipient_total: Amount,
    /// Rewards claimed across all recipients after this claim.
    pub total_rewards: Amount,
}

/// Result of collecting the treasury fee on a minted amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeReceipt {
    pub minted: Amount,
    pub treasury_fee: Amount,
    pub net_amount: Amount,
    /// BTC added to the forge fee pool (zero when no deposit was required).
    pub forge_fee_sats: u64,
    pub fee_output: Option<OutputId>,
}

/// Everything behind the lock. Serialized as-is into snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TreasuryState {
    pub(crate) balance: Amount,
    pub(crate) total_forged: u64,
    pub(crate) total_rewards: Amount,
    pub(crate) total_fees_collected: Amount,
    pub(crate) fee_pool_sats: u64,
    pub(crate) current_height: BlockHeight,
    pub(crate) next_output_id: OutputId,
    pub(crate) outputs: Vec<MiniOutput>,
    pub(crate) claims: BTreeMap<String, Amount>,
    pub(crate) distributions: Vec<Distribution>,
}

/// An output waiting to be assigned an id.
struct NewOutput {
    kind: OutputKind,
    forge_id: Option<u64>,
    amount: Amount,
    unlock_height: BlockHeight,
}

/// Outputs and counters computed against a state but not yet written to it.
struct StagedOutputs {
    outputs: Vec<MiniOutput>,
    next_output_id: OutputId,
    balance: Amount,
}

impl TreasuryState {
    /// Assign ids to `new` and add their amounts to `balance`. Nothing is
    /// written until [`commit`](Self::commit), so an overflow leaves the
    /// state untouched.
    fn stage(&self, balance: Amount, new: Vec<NewOutput>) -> Result<StagedOutputs, TreasuryError> {
        let mut next_output_id = self.next_output_id;
        let mut balance = balance;
        let mut outputs = Vec::with_capacity(new.len());
        for n in new {
            next_output_id = next_output_id
                .checked_add(1)
                .ok_or(TreasuryError::Overflow)?;
            balance = balance
                .checked_add(n.amount)
                .ok_or(TreasuryError::Overflow)?;
            outputs.push(MiniOutput {
                output_id: next_output_id,
                kind: n.kind,
                forge_id: n.forge_id,
                created_at_height: self.current_height,
                amount: n.amount,
                unlock_height: n.unlock_height,
                spent: false,
            });
        }
        Ok(StagedOutputs {
            outputs,
            next_output_id,
            balance,
        })
    }

    fn commit(&mut self, staged: StagedOutputs) -> Vec<MiniOutput> {
        self.next_output_id = staged.next_output_id;
        self.balance = staged.balance;
        self.outputs.extend(staged.outputs.iter().cloned());
        staged.outputs
    }

    pub(crate) fn spendable_balance(&self) -> Amount {
        self.outputs
            .iter()
            .filter(|o| o.is_spendable(self.current_height))
            .map(|o| o.amount)
            .sum()
    }

    pub(crate) fn locked_balance(&self) -> Amount {
        self.outputs
            .iter()
            .filter(|o| o.is_locked(self.current_height))
            .map(|o| o.amount)
            .sum()
    }
}

/// The treasury ledger.
///
/// Mutations take the write lock for their whole duration, so each operation
/// is atomic with respect to every other; queries take the read lock.
pub struct Treasury {
    config: TreasuryConfig,
    state: RwLock<TreasuryState>,
    counters: StatsCounter,
}

impl Treasury {
    /// A treasury with canonical parameters at height 0.
    pub fn new() -> Self {
        Self::from_state(TreasuryConfig::default(), TreasuryState::default())
    }

    /// An empty treasury with a caller-built config, checked first.
    pub fn with_config(config: TreasuryConfig) -> Result<Self, TreasuryError> {
        config.validate()?;
        Ok(Self::from_state(config, TreasuryState::default()))
    }

    /// Validate `params` and build a treasury from them.
    pub fn from_params(params: &ForgeParams) -> Result<Self, TreasuryError> {
        Self::with_config(TreasuryConfig::from_params(params)?)
    }

    pub(crate) fn from_state(config: TreasuryConfig, state: TreasuryState) -> Self {
        Self {
            config,
            state: RwLock::new(state),
            counters: StatsCounter::new(COUNTER_NAMES),
        }
    }

    pub fn config(&self) -> &TreasuryConfig {
        &self.config
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, TreasuryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TreasuryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn counters(&self) -> &StatsCounter {
        &self.counters
    }

    // ── Forging ──────────────────────────────────────────────────────────

    /// Record a forge without the King's Tithe.
    pub fn process_forge(&self, recipient: &str) -> Result<ForgeResult, TreasuryError> {
        self.process_forge_with_tithe(recipient, false)
    }

    /// Record a forge: split the reward, lock the treasury allocation into
    /// mini-outputs and, when `tithe` is set, move the King's Tithe from the
    /// miner share into the treasury.
    pub fn process_forge_with_tithe(
        &self,
        recipient: &str,
        tithe: bool,
    ) -> Result<ForgeResult, TreasuryError> {
        validate_recipient(recipient)?;

        let config = &self.config;
        let mut state = self.write();

        let forged_before = state.total_forged;
        let forge_id = forged_before.checked_add(1).ok_or(TreasuryError::Overflow)?;
        let height = state.current_height;

        let total_reward = config.forge_reward;
        let allocation = config.treasury_allocation;
        let mut miner_reward = total_reward
            .checked_sub(allocation)
            .ok_or(TreasuryError::Overflow)?;
        let kings_tithe = if tithe {
            miner_reward.share_bps(config.kings_tithe_bps)
        } else {
            Amount::ZERO
        };
        miner_reward = miner_reward
            .checked_sub(kings_tithe)
            .ok_or(TreasuryError::Overflow)?;

        let mut new: Vec<NewOutput> = config
            .mini_output_delays
            .iter()
            .map(|&delay| NewOutput {
                kind: OutputKind::Allocation,
                forge_id: Some(forge_id),
                amount: config.mini_output_amount,
                unlock_height: height.after(delay),
            })
            .collect();
        if !kings_tithe.is_zero() {
            new.push(NewOutput {
                kind: OutputKind::Tithe,
                forge_id: Some(forge_id),
                amount: kings_tithe,
                unlock_height: height,
            });
        }
        let staged = state.stage(state.balance, new)?;

        let mut mini_outputs = state.commit(staged);
        let tithe_output = if kings_tithe.is_zero() {
            None
        } else {
            self.counters.increment("tithes");
            mini_outputs.pop()
        };
        state.total_forged = forge_id;
        self.counters.increment("forges");

        info!(
            forge_id,
            recipient,
            %height,
            %miner_reward,
            %kings_tithe,
            balance = %state.balance,
            "forge processed"
        );

        Ok(ForgeResult {
            forge_id,
            recipient: recipient.to_string(),
            total_reward,
            miner_reward,
            treasury_allocation: allocation,
            kings_tithe,
            mini_outputs,
            tithe_output,
            block_height: height,
            forge_fee_sats: config.fee_schedule.fee_for(forged_before),
        })
    }

    // ── Height ───────────────────────────────────────────────────────────

    /// Advance the ledger height. Heights below the current one are ignored.
    pub fn set_block_height(&self, height: BlockHeight) {
        let mut state = self.write();
        if height < state.current_height {
            warn!(
                current = %state.current_height,
                requested = %height,
                "ignoring block height regression"
            );
            return;
        }
        debug!(%height, "block height updated");
        state.current_height = height;
    }

    pub fn block_height(&self) -> BlockHeight {
        self.read().current_height
    }

    // ── Balances ─────────────────────────────────────────────────────────

    /// Spendable plus locked funds.
    pub fn balance(&self) -> Amount {
        self.read().balance
    }

    pub fn spendable_balance(&self) -> Amount {
        self.read().spendable_balance()
    }

    pub fn locked_balance(&self) -> Amount {
        self.read().locked_balance()
    }

    pub fn total_forged(&self) -> u64 {
        self.read().total_forged
    }

    pub fn total_rewards(&self) -> Amount {
        self.read().total_rewards
    }

    /// Accumulated BTC forge fees, in satoshis.
    pub fn fee_pool_sats(&self) -> u64 {
        self.read().fee_pool_sats
    }

    // ── Claims ───────────────────────────────────────────────────────────

    /// Claim one forge reward for `recipient`, backed by a proof hash.
    pub fn claim_reward(
        &self,
        recipient: &str,
        proof_hash: &Hash32,
    ) -> Result<Claim, TreasuryError> {
        validate_recipient(recipient)?;

        let required = self.config.claim_leading_zero_bytes;
        if !meets_leading_zero_bytes(proof_hash, required) {
            self.counters.increment("claims_rejected");
            return Err(TreasuryError::DifficultyNotMet {
                actual: proof_hash.leading_zero_bytes(),
                required,
            });
        }

        let reward = self.config.forge_reward;
        let mut state = self.write();
        let attempted = state
            .total_rewards
            .checked_add(reward)
            .ok_or(TreasuryError::Overflow)?;
        if attempted > self.config.max_supply {
            self.counters.increment("claims_rejected");
            return Err(TreasuryError::SupplyExceeded {
                reward,
                attempted,
                max_supply: self.config.max_supply,
            });
        }

        let entry = state
            .claims
            .entry(recipient.to_string())
            .or_insert(Amount::ZERO);
        *entry = entry.checked_add(reward).ok_or(TreasuryError::Overflow)?;
        let recipient_total = *entry;
        state.total_rewards = attempted;
        self.counters.increment("claims");

        info!(recipient, %reward, total_rewards = %attempted, "reward claimed");

        Ok(Claim {
            recipient: recipient.to_string(),
            amount: reward,
            recipient_total,
            total_rewards: attempted,
        })
    }

    /// Cumulative rewards claimed by `recipient`.
    pub fn claims_of(&self, recipient: &str) -> Amount {
        self.read()
            .claims
            .get(recipient)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    // ── Spending ─────────────────────────────────────────────────────────

    /// Pay `amount` out of spendable funds, oldest outputs first.
    pub fn distribute(
        &self,
        amount: Amount,
        recipient: &str,
        purpose: &str,
    ) -> Result<Distribution, TreasuryError> {
        if amount.is_zero() {
            return Err(TreasuryError::ZeroAmount);
        }
        if recipient.trim().is_empty() {
            return Err(TreasuryError::InvalidRecipient {
                address: recipient.to_string(),
                reason: "empty recipient".into(),
            });
        }

        let mut state = self.write();
        let available = state.spendable_balance();
        if amount > available {
            return Err(TreasuryError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let height = state.current_height;
        let mut gathered = Amount::ZERO;
        let mut consumed = Vec::new();
        for (index, output) in state.outputs.iter().enumerate() {
            if gathered >= amount {
                break;
            }
            if output.is_spendable(height) {
                gathered = gathered
                    .checked_add(output.amount)
                    .ok_or(TreasuryError::Overflow)?;
                consumed.push(index);
            }
        }
        let change = gathered
            .checked_sub(amount)
            .ok_or(TreasuryError::Overflow)?;
        let remaining = state
            .balance
            .checked_sub(gathered)
            .ok_or(TreasuryError::Overflow)?;
        let change_spec = if change.is_zero() {
            Vec::new()
        } else {
            vec![NewOutput {
                kind: OutputKind::Change,
                forge_id: None,
                amount: change,
                unlock_height: height,
            }]
        };
        let staged = state.stage(remaining, change_spec)?;

        let mut consumed_outputs = Vec::with_capacity(consumed.len());
        for index in consumed {
            let output = &mut state.outputs[index];
            output.spent = true;
            consumed_outputs.push(output.output_id);
        }
        let change_output = state.commit(staged).first().map(|o| o.output_id);

        let distribution = Distribution {
            id: state.distributions.len() as u64 + 1,
            block_height: height,
            amount,
            recipient: recipient.to_string(),
            purpose: purpose.to_string(),
            consumed_outputs,
            change_output,
        };
        state.distributions.push(distribution.clone());
        self.counters.increment("distributions");

        info!(
            id = distribution.id,
            %amount,
            recipient,
            purpose,
            balance = %state.balance,
            "treasury distribution"
        );

        Ok(distribution)
    }

    /// Mark a single unlocked output as spent.
    pub fn spend_output(&self, output_id: OutputId) -> Result<MiniOutput, TreasuryError> {
        let mut state = self.write();
        let height = state.current_height;
        let output = state
            .outputs
            .iter_mut()
            .find(|o| o.output_id == output_id)
            .ok_or(TreasuryError::OutputNotFound(output_id))?;

        if output.spent {
            return Err(TreasuryError::AlreadySpent(output_id));
        }
        if !height.has_reached(output.unlock_height) {
            return Err(TreasuryError::LockNotReached {
                output_id,
                unlock_height: output.unlock_height,
                current_height: height,
            });
        }

        output.spent = true;
        let spent = output.clone();
        state.balance = state
            .balance
            .checked_sub(spent.amount)
            .ok_or(TreasuryError::Overflow)?;
        self.counters.increment("outputs_spent");

        debug!(output_id, amount = %spent.amount, "output spent");
        Ok(spent)
    }

    // ── Fees ─────────────────────────────────────────────────────────────

    /// Take the treasury fee from a minted amount and, when a BTC deposit is
    /// required, add the forge fee to the fee pool.
    pub fn process_forge_fee(
        &self,
        minted: Amount,
        deposit_required: bool,
    ) -> Result<FeeReceipt, TreasuryError> {
        if minted.is_zero() {
            return Err(TreasuryError::ZeroAmount);
        }

        let treasury_fee = minted.share_bps(self.config.treasury_fee_bps);
        let net_amount = minted
            .checked_sub(treasury_fee)
            .ok_or(TreasuryError::Overflow)?;
        let forge_fee_sats = if deposit_required {
            self.config.forge_fee_sats
        } else {
            0
        };

        let mut state = self.write();
        let height = state.current_height;
        let total_fees_collected = state
            .total_fees_collected
            .checked_add(treasury_fee)
            .ok_or(TreasuryError::Overflow)?;
        let fee_pool_sats = state
            .fee_pool_sats
            .checked_add(forge_fee_sats)
            .ok_or(TreasuryError::Overflow)?;
        let fee_spec = if treasury_fee.is_zero() {
            Vec::new()
        } else {
            vec![NewOutput {
                kind: OutputKind::Fee,
                forge_id: None,
                amount: treasury_fee,
                unlock_height: height,
            }]
        };
        let staged = state.stage(state.balance, fee_spec)?;

        let fee_output = state.commit(staged).first().map(|o| o.output_id);
        state.total_fees_collected = total_fees_collected;
        state.fee_pool_sats = fee_pool_sats;
        self.counters.increment("fees_collected");

        debug!(%minted, %treasury_fee, forge_fee_sats, "forge fee collected");

        Ok(FeeReceipt {
            minted,
            treasury_fee,
            net_amount,
            forge_fee_sats,
            fee_output,
        })
    }

    /// Fee the next forge will pay under the configured schedule.
    pub fn next_forge_fee_sats(&self) -> u64 {
        self.config.fee_schedule.fee_for(self.read().total_forged)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Every output, in creation order.
    pub fn outputs(&self) -> Vec<MiniOutput> {
        self.read().outputs.clone()
    }

    /// Allocation outputs only (the forge mini-outputs).
    pub fn mini_outputs(&self) -> Vec<MiniOutput> {
        self.read()
            .outputs
            .iter()
            .filter(|o| o.kind == OutputKind::Allocation)
            .cloned()
            .collect()
    }

    pub fn spendable_outputs(&self) -> Vec<MiniOutput> {
        let state = self.read();
        state
            .outputs
            .iter()
            .filter(|o| o.is_spendable(state.current_height))
            .cloned()
            .collect()
    }

    pub fn locked_outputs(&self) -> Vec<MiniOutput> {
        let state = self.read();
        state
            .outputs
            .iter()
            .filter(|o| o.is_locked(state.current_height))
            .cloned()
            .collect()
    }

    pub fn output(&self, output_id: OutputId) -> Option<MiniOutput> {
        self.read()
            .outputs
            .iter()
            .find(|o| o.output_id == output_id)
            .cloned()
    }

    pub fn distributions(&self) -> Vec<Distribution> {
        self.read().distributions.clone()
    }
}

impl Default for Treasury {
    fn default() -> Self {
        Self::new()
    }
}
