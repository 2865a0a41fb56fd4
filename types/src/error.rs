//! Top-level error taxonomy shared across crates.
//!
//! Each crate keeps its own precise error enum; all of them convert into
//! `ForgeError` so callers can branch on the category alone.

use thiserror::Error;

/// Common error categories for the forge protocol.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Wrong phrase length, wrong hash length, zero lock height, bad address, bad seed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A supplied proof hash does not carry the required leading-zero pattern.
    #[error("proof does not meet difficulty: {0}")]
    DifficultyNotMet(String),

    #[error("maximum supply exceeded: {0}")]
    SupplyExceeded(String),

    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("time lock not reached: {0}")]
    LockNotReached(String),

    #[error("{0}")]
    Other(String),
}
