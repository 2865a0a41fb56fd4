//! Crypto-specific errors.

use forge_types::ForgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("secret phrase must contain exactly {expected} words, got {actual}")]
    InvalidPhraseLength { expected: usize, actual: usize },

    #[error("Tetra-PoW seed must be exactly {expected} bytes, got {actual}")]
    InvalidSeedLength { expected: usize, actual: usize },

    #[error("HPP-1 round count must be greater than zero")]
    InvalidRounds,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("address encoding failed: {0}")]
    AddressEncoding(String),

    #[error("invalid taproot address: {0}")]
    InvalidAddress(String),
}

impl From<CryptoError> for ForgeError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidPhraseLength { .. }
            | CryptoError::InvalidSeedLength { .. }
            | CryptoError::InvalidRounds
            | CryptoError::InvalidAddress(_) => ForgeError::InvalidInput(e.to_string()),
            CryptoError::KeyDerivation(_) | CryptoError::AddressEncoding(_) => {
                ForgeError::Other(e.to_string())
            }
        }
    }
}
