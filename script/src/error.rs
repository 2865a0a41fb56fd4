use forge_types::ForgeError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("recipient hash must be {expected} bytes, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    #[error("lock height must be greater than zero")]
    InvalidLockHeight,

    #[error("malformed CLTV script: {0}")]
    MalformedScript(String),
}

impl From<ScriptError> for ForgeError {
    fn from(e: ScriptError) -> Self {
        ForgeError::InvalidInput(e.to_string())
    }
}
