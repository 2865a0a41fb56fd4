//! Protocol parameters: every economic and cryptographic constant of the forge.
//!
//! Defaults reproduce the canonical network. Any field can be overridden from a
//! TOML file; missing fields fall back to the defaults.

use crate::amount::{Amount, BPS_DENOMINATOR};
use crate::network::Network;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// HPP-1 iteration count.
pub const HPP1_ROUNDS: u32 = 600_000;

/// Default HPP-1 salt for vault derivation.
pub const DEFAULT_FORGE_SALT: &str = "Excalibur-EXS-Forge";

/// HPP-1 salt used by the mining search loop.
pub const DEFAULT_MINING_SALT: &str = "Excalibur-EXS-\u{3a9}\u{2032}\u{394}18";

/// Mini-outputs created per accepted forge.
pub const MINI_OUTPUT_COUNT: usize = 3;

/// Reference unlock delays: immediate, ~1 month, ~2 months at 144 blocks/day.
pub const MINI_OUTPUT_DELAYS: [u32; MINI_OUTPUT_COUNT] = [0, 4320, 8640];

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameters: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize parameters: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid parameter {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All forge protocol parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeParams {
    // ── Key stretching ───────────────────────────────────────────────────
    /// PBKDF2-HMAC-SHA512 iterations for every HPP-1 invocation.
    pub hpp1_rounds: u32,

    /// Salt used by vault derivation when the caller supplies none.
    pub forge_salt: String,

    /// Salt used by the mining search loop.
    pub mining_salt: String,

    // ── Mining ───────────────────────────────────────────────────────────
    /// Leading zero bytes a proof hash needs for a reward claim.
    pub claim_leading_zero_bytes: u32,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Total reward per accepted forge (whole EXS).
    pub forge_reward_exs: u64,

    /// Treasury share of each forge reward (basis points).
    pub treasury_allocation_bps: u32,

    /// Unlock delay (blocks) of each mini-output, in creation order.
    pub mini_output_delays: [u32; MINI_OUTPUT_COUNT],

    /// King's Tithe taken from the miner share when enabled (basis points).
    pub kings_tithe_bps: u32,

    /// Treasury fee on minted amounts (basis points).
    pub treasury_fee_bps: u32,

    /// BTC forge fee collected per deposit-backed forge (satoshis).
    pub forge_fee_sats: u64,

    /// Hard cap on cumulative claimed rewards (whole EXS).
    pub max_supply_exs: u64,

    // ── Forge fee schedule ───────────────────────────────────────────────
    pub fee_base_sats: u64,
    pub fee_increment_sats: u64,
    pub fee_increment_interval: u64,
    pub fee_max_sats: u64,
}

impl ForgeParams {
    /// Canonical network parameters.
    pub fn canonical() -> Self {
        Self {
            hpp1_rounds: HPP1_ROUNDS,
            forge_salt: DEFAULT_FORGE_SALT.to_string(),
            mining_salt: DEFAULT_MINING_SALT.to_string(),

            claim_leading_zero_bytes: 4,

            forge_reward_exs: 50,
            treasury_allocation_bps: 1500, // 15%
            mini_output_delays: MINI_OUTPUT_DELAYS,
            kings_tithe_bps: 100,  // 1%
            treasury_fee_bps: 100, // 1%
            forge_fee_sats: 10_000, // 0.0001 BTC
            max_supply_exs: 21_000_000,

            fee_base_sats: 100_000_000,      // 1 BTC
            fee_increment_sats: 10_000_000,  // 0.1 BTC
            fee_increment_interval: 10_000,  // forges
            fee_max_sats: 2_100_000_000,     // 21 BTC
        }
    }

    /// Parameters for a given network. Regtest uses a cheap HPP-1 profile so
    /// local development is not dominated by key stretching.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Regtest => Self {
                hpp1_rounds: 1_000,
                ..Self::canonical()
            },
            Network::Mainnet | Network::Testnet => Self::canonical(),
        }
    }

    /// Load and validate parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ParamsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Total reward of one forge.
    pub fn forge_reward(&self) -> Amount {
        Amount::from_exs(self.forge_reward_exs as u128)
    }

    /// Cap on cumulative claimed rewards.
    pub fn max_supply(&self) -> Amount {
        Amount::from_exs(self.max_supply_exs as u128)
    }

    /// Treasury share of one forge reward.
    pub fn treasury_allocation(&self) -> Amount {
        self.forge_reward().share_bps(self.treasury_allocation_bps)
    }

    /// Amount carried by each mini-output.
    pub fn mini_output_amount(&self) -> Amount {
        // validate() guarantees an even split
        self.treasury_allocation()
            .split_even(MINI_OUTPUT_COUNT as u32)
            .unwrap_or(Amount::ZERO)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.hpp1_rounds == 0 {
            return Err(invalid("hpp1_rounds", "must be greater than zero"));
        }
        if self.treasury_allocation_bps as u128 > BPS_DENOMINATOR {
            return Err(invalid("treasury_allocation_bps", "exceeds 10000"));
        }
        if self.kings_tithe_bps as u128 > BPS_DENOMINATOR {
            return Err(invalid("kings_tithe_bps", "exceeds 10000"));
        }
        if self.treasury_fee_bps as u128 > BPS_DENOMINATOR {
            return Err(invalid("treasury_fee_bps", "exceeds 10000"));
        }
        if self.mini_output_delays[0] != 0 {
            return Err(invalid("mini_output_delays", "first output must unlock immediately"));
        }
        if self.mini_output_delays.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("mini_output_delays", "delays must be strictly increasing"));
        }
        if self
            .treasury_allocation()
            .split_even(MINI_OUTPUT_COUNT as u32)
            .is_none()
        {
            return Err(invalid(
                "treasury_allocation_bps",
                "allocation must split evenly into mini-outputs",
            ));
        }
        if self.forge_reward_exs == 0 {
            return Err(invalid("forge_reward_exs", "must be greater than zero"));
        }
        if self.claim_leading_zero_bytes > 32 {
            return Err(invalid("claim_leading_zero_bytes", "exceeds hash length"));
        }
        if self.fee_increment_interval == 0 {
            return Err(invalid("fee_increment_interval", "must be greater than zero"));
        }
        if self.fee_max_sats < self.fee_base_sats {
            return Err(invalid("fee_max_sats", "cap is below the base fee"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ParamsError {
    ParamsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

impl Default for ForgeParams {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn canonical_is_valid() {
        ForgeParams::canonical().validate().unwrap();
    }

    #[test]
    fn canonical_split() {
        let p = ForgeParams::canonical();
        assert_eq!(p.treasury_allocation(), Amount::new(750_000_000));
        assert_eq!(p.mini_output_amount(), Amount::new(250_000_000));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let p = ForgeParams::from_toml_str("hpp1_rounds = 10\nkings_tithe_bps = 200\n").unwrap();
        assert_eq!(p.hpp1_rounds, 10);
        assert_eq!(p.kings_tithe_bps, 200);
        assert_eq!(p.treasury_allocation_bps, 1500);
        assert_eq!(p.mini_output_delays, MINI_OUTPUT_DELAYS);
    }

    #[test]
    fn toml_roundtrip() {
        let p = ForgeParams::for_network(Network::Regtest);
        let s = p.to_toml_string().unwrap();
        let back = ForgeParams::from_toml_str(&s).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn zero_rounds_rejected() {
        let err = ForgeParams::from_toml_str("hpp1_rounds = 0").unwrap_err();
        assert!(matches!(err, ParamsError::Invalid { field: "hpp1_rounds", .. }));
    }

    #[test]
    fn non_increasing_delays_rejected() {
        let err = ForgeParams::from_toml_str("mini_output_delays = [0, 10, 10]").unwrap_err();
        assert!(matches!(err, ParamsError::Invalid { field: "mini_output_delays", .. }));
    }

    #[test]
    fn uneven_allocation_rejected() {
        let mut p = ForgeParams::canonical();
        p.forge_reward_exs = 1;
        p.treasury_allocation_bps = 1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "claim_leading_zero_bytes = 1").unwrap();
        let p = ForgeParams::from_toml_file(file.path()).unwrap();
        assert_eq!(p.claim_leading_zero_bytes, 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ForgeParams::from_toml_file("/nonexistent/forge.toml").unwrap_err();
        assert!(matches!(err, ParamsError::Io(_)));
    }
}
