//! Treasury configuration derived from protocol parameters.

use forge_types::amount::BPS_DENOMINATOR;
use forge_types::params::MINI_OUTPUT_COUNT;
use forge_types::{Amount, ForgeParams, ParamsError};

use crate::{FeeSchedule, TreasuryError};

/// Block interval between successive mini-output unlocks.
pub const BLOCK_INTERVAL: u32 = 4_320;

/// Precomputed economic constants for a [`Treasury`](crate::Treasury).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreasuryConfig {
    pub forge_reward: Amount,
    pub treasury_allocation: Amount,
    pub mini_output_amount: Amount,
    pub mini_output_delays: [u32; MINI_OUTPUT_COUNT],
    pub kings_tithe_bps: u32,
    pub treasury_fee_bps: u32,
    pub forge_fee_sats: u64,
    pub max_supply: Amount,
    pub claim_leading_zero_bytes: usize,
    pub fee_schedule: FeeSchedule,
}

impl TreasuryConfig {
    /// Validate `params` and derive the treasury view of them.
    pub fn from_params(params: &ForgeParams) -> Result<Self, TreasuryError> {
        params.validate()?;
        Ok(Self::derive(params))
    }

    fn derive(params: &ForgeParams) -> Self {
        Self {
            forge_reward: params.forge_reward(),
            treasury_allocation: params.treasury_allocation(),
            mini_output_amount: params.mini_output_amount(),
            mini_output_delays: params.mini_output_delays,
            kings_tithe_bps: params.kings_tithe_bps,
            treasury_fee_bps: params.treasury_fee_bps,
            forge_fee_sats: params.forge_fee_sats,
            max_supply: params.max_supply(),
            claim_leading_zero_bytes: params.claim_leading_zero_bytes as usize,
            fee_schedule: FeeSchedule::from_params(params),
        }
    }

    /// Check the derived amounts still agree with each other. Fields are
    /// public, so a hand-built config must pass this before a ledger uses it.
    pub fn validate(&self) -> Result<(), TreasuryError> {
        if self.forge_reward.is_zero() {
            return Err(invalid("forge_reward", "must be greater than zero"));
        }
        if self.treasury_allocation > self.forge_reward {
            return Err(invalid("treasury_allocation", "exceeds the forge reward"));
        }
        if self.mini_output_amount.checked_mul(MINI_OUTPUT_COUNT as u128)
            != Some(self.treasury_allocation)
        {
            return Err(invalid(
                "mini_output_amount",
                "mini-outputs must sum to the treasury allocation",
            ));
        }
        if self.mini_output_delays[0] != 0 {
            return Err(invalid("mini_output_delays", "first output must unlock immediately"));
        }
        if self.mini_output_delays.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("mini_output_delays", "delays must be strictly increasing"));
        }
        if self.kings_tithe_bps as u128 > BPS_DENOMINATOR {
            return Err(invalid("kings_tithe_bps", "exceeds 10000"));
        }
        if self.treasury_fee_bps as u128 > BPS_DENOMINATOR {
            return Err(invalid("treasury_fee_bps", "exceeds 10000"));
        }
        if self.claim_leading_zero_bytes > 32 {
            return Err(invalid("claim_leading_zero_bytes", "exceeds hash length"));
        }
        Ok(())
    }

    /// Blocks between the first and second mini-output unlock.
    pub fn block_interval(&self) -> u32 {
        self.mini_output_delays
            .get(1)
            .copied()
            .unwrap_or(BLOCK_INTERVAL)
    }

    /// Forges that fit under the supply cap.
    pub fn max_forges(&self) -> u64 {
        let reward = self.forge_reward.raw();
        if reward == 0 {
            return 0;
        }
        u64::try_from(self.max_supply.raw() / reward).unwrap_or(u64::MAX)
    }
}

fn invalid(field: &'static str, reason: &str) -> TreasuryError {
    TreasuryError::Params(ParamsError::Invalid {
        field,
        reason: reason.to_string(),
    })
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self::derive(&ForgeParams::canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_types::EXS_UNIT;

    #[test]
    fn test_canonical_amounts() {
        let config = TreasuryConfig::default();
        assert_eq!(config.forge_reward, Amount::from_exs(50));
        assert_eq!(config.treasury_allocation, Amount::new(750_000_000));
        assert_eq!(config.mini_output_amount, Amount::new(250_000_000));
        assert_eq!(config.mini_output_delays, [0, 4320, 8640]);
        assert_eq!(config.block_interval(), BLOCK_INTERVAL);
        assert_eq!(config.max_supply.raw(), 21_000_000 * EXS_UNIT);
        assert_eq!(config.max_forges(), 420_000);
    }

    #[test]
    fn test_from_params_validates() {
        let params = ForgeParams {
            kings_tithe_bps: 20_000,
            ..ForgeParams::canonical()
        };
        assert!(matches!(
            TreasuryConfig::from_params(&params),
            Err(TreasuryError::Params(_))
        ));
    }

    #[test]
    fn test_default_is_valid() {
        TreasuryConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_oversized_tithe() {
        let config = TreasuryConfig {
            kings_tithe_bps: 20_000,
            ..TreasuryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TreasuryError::Params(ParamsError::Invalid {
                field: "kings_tithe_bps",
                ..
            }))
        ));
    }

    #[test]
    fn test_validate_rejects_mismatched_mini_outputs() {
        let config = TreasuryConfig {
            mini_output_amount: Amount::new(1),
            ..TreasuryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TreasuryError::Params(ParamsError::Invalid {
                field: "mini_output_amount",
                ..
            }))
        ));
    }

    #[test]
    fn test_validate_rejects_allocation_above_reward() {
        let config = TreasuryConfig {
            treasury_allocation: Amount::from_exs(60),
            mini_output_amount: Amount::from_exs(20),
            ..TreasuryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_delays() {
        let config = TreasuryConfig {
            mini_output_delays: [0, 8640, 4320],
            ..TreasuryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_params_matches_default() {
        let config = TreasuryConfig::from_params(&ForgeParams::canonical()).unwrap();
        assert_eq!(config, TreasuryConfig::default());
    }
}
