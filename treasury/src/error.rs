//! Treasury-specific errors.

use forge_script::ScriptError;
use forge_types::{Amount, BlockHeight, ForgeError, ParamsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreasuryError {
    #[error("invalid recipient address {address:?}: {reason}")]
    InvalidRecipient { address: String, reason: String },

    #[error("proof hash has {actual} leading zero bytes, need {required}")]
    DifficultyNotMet { actual: usize, required: usize },

    #[error("claiming {reward} would bring total rewards to {attempted}, above the cap of {max_supply}")]
    SupplyExceeded {
        reward: Amount,
        attempted: Amount,
        max_supply: Amount,
    },

    #[error("insufficient spendable balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("output {output_id} is locked until {unlock_height} (current height {current_height})")]
    LockNotReached {
        output_id: u64,
        unlock_height: BlockHeight,
        current_height: BlockHeight,
    },

    #[error("output {0} has already been spent")]
    AlreadySpent(u64),

    #[error("output {0} not found")]
    OutputNotFound(u64),

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in treasury accounting")]
    Overflow,

    #[error("snapshot integrity check failed")]
    SnapshotCorrupt,

    #[error("serialization: {0}")]
    Serialization(String),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl From<TreasuryError> for ForgeError {
    fn from(e: TreasuryError) -> Self {
        match e {
            TreasuryError::DifficultyNotMet { .. } => ForgeError::DifficultyNotMet(e.to_string()),
            TreasuryError::SupplyExceeded { .. } => ForgeError::SupplyExceeded(e.to_string()),
            TreasuryError::InsufficientBalance { .. } => {
                ForgeError::InsufficientBalance(e.to_string())
            }
            TreasuryError::LockNotReached { .. } => ForgeError::LockNotReached(e.to_string()),
            TreasuryError::InvalidRecipient { .. }
            | TreasuryError::ZeroAmount
            | TreasuryError::OutputNotFound(_)
            | TreasuryError::AlreadySpent(_)
            | TreasuryError::Params(_)
            | TreasuryError::Script(_) => ForgeError::InvalidInput(e.to_string()),
            TreasuryError::Overflow
            | TreasuryError::SnapshotCorrupt
            | TreasuryError::Serialization(_) => ForgeError::Other(e.to_string()),
        }
    }
}
