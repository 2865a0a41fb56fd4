//! HPP-1 key stretching: PBKDF2-HMAC-SHA512 with a large fixed iteration count.
//!
//! Every place a secret is hardened before use as key material goes through
//! this module. A full-strength call costs hundreds of milliseconds; callers on
//! hot paths (the mining loop) pay it once per nonce.

use hmac::Hmac;
use sha2::Sha512;

use crate::CryptoError;
use forge_types::params::HPP1_ROUNDS;

/// A configured HPP-1 stretcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hpp1 {
    rounds: u32,
}

impl Hpp1 {
    /// Full-strength configuration (600,000 rounds).
    pub const STANDARD: Self = Self {
        rounds: HPP1_ROUNDS,
    };

    /// Create a stretcher with a custom round count.
    pub fn new(rounds: u32) -> Result<Self, CryptoError> {
        if rounds == 0 {
            return Err(CryptoError::InvalidRounds);
        }
        Ok(Self { rounds })
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Stretch `secret` with `salt` into `output_len` bytes.
    pub fn stretch(&self, secret: &[u8], salt: &[u8], output_len: usize) -> Vec<u8> {
        let mut out = vec![0u8; output_len];
        self.stretch_into(secret, salt, &mut out);
        out
    }

    /// Stretch into a caller-provided buffer; the buffer length is the output length.
    pub fn stretch_into(&self, secret: &[u8], salt: &[u8], out: &mut [u8]) {
        // HMAC accepts keys of any length, so the PRF cannot fail here.
        let _ = pbkdf2::pbkdf2::<Hmac<Sha512>>(secret, salt, self.rounds, out);
    }
}

impl Default for Hpp1 {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Stretch with the full-strength configuration.
pub fn stretch(secret: &[u8], salt: &[u8], output_len: usize) -> Vec<u8> {
    Hpp1::STANDARD.stretch(secret, salt, output_len)
}
