use forge_crypto::CryptoError;
use forge_types::ForgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("hash value {value:#018x} not below target {target:#018x}")]
    InsufficientDifficulty { value: u64, target: u64 },

    #[error("proof hash does not match nonce {nonce}")]
    HashMismatch { nonce: u64 },

    #[error("target 0 can never be met")]
    UnreachableTarget,

    #[error("work generation cancelled")]
    Cancelled,

    #[error("miner configuration: {0}")]
    Config(#[from] CryptoError),
}

impl From<WorkError> for ForgeError {
    fn from(e: WorkError) -> Self {
        match e {
            WorkError::InsufficientDifficulty { .. } | WorkError::HashMismatch { .. } => {
                ForgeError::DifficultyNotMet(e.to_string())
            }
            WorkError::UnreachableTarget | WorkError::Config(_) => {
                ForgeError::InvalidInput(e.to_string())
            }
            WorkError::Cancelled => ForgeError::Other(e.to_string()),
        }
    }
}
