//! Tetra-PoW: a four-word nonlinear mixing engine.
//!
//! The state is four little-endian `u64` words loaded from a 32-byte seed.
//! Each round mixes every word with shifted copies of its neighbours, then adds
//! a distinct odd constant. The rotation amounts and constants are part of the
//! address format and must never change.

use crate::CryptoError;

/// Rounds applied by [`TetraPow::compute`].
pub const TETRA_ROUNDS: usize = 128;

/// Required seed length in bytes.
pub const SEED_LEN: usize = 32;

const ROUND_CONSTANTS: [u64; 4] = [
    0x9E37_79B9_7F4A_7C15,
    0x243F_6A88_85A3_08D3,
    0x1319_8A2E_0370_7344,
    0xA409_3822_299F_31D0,
];

/// Tetra-PoW mixing state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TetraPow {
    state: [u64; 4],
}

impl TetraPow {
    /// Load the state from a seed of exactly 32 bytes.
    pub fn new(seed: &[u8]) -> Result<Self, CryptoError> {
        let seed: &[u8; SEED_LEN] = seed.try_into().map_err(|_| CryptoError::InvalidSeedLength {
            expected: SEED_LEN,
            actual: seed.len(),
        })?;
        Ok(Self::from_seed(seed))
    }

    /// Load the state from a fixed-size seed (infallible).
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        let mut state = [0u64; 4];
        for (word, chunk) in state.iter_mut().zip(seed.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *word = u64::from_le_bytes(bytes);
        }
        Self { state }
    }

    /// Current state words.
    pub fn state(&self) -> [u64; 4] {
        self.state
    }

    /// Apply one mixing round. Words are updated in order, so later words see
    /// the already-mixed values of earlier ones.
    pub fn round(&mut self) {
        let s = &mut self.state;
        s[0] ^= (s[1] << 13) ^ (s[3] >> 7);
        s[1] ^= (s[2] << 17) ^ (s[0] >> 5);
        s[2] ^= (s[3] << 23) ^ (s[1] >> 11);
        s[3] ^= (s[0] << 29) ^ (s[2] >> 3);

        for (word, k) in s.iter_mut().zip(ROUND_CONSTANTS) {
            *word = word.wrapping_add(k);
        }
    }

    /// Run all 128 rounds and serialize the state as a 32-byte little-endian digest.
    pub fn compute(mut self) -> [u8; 32] {
        for _ in 0..TETRA_ROUNDS {
            self.round();
        }
        self.digest()
    }

    fn digest(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}

/// One-shot Tetra-PoW over a fixed-size seed.
pub fn tetra_pow(seed: &[u8; SEED_LEN]) -> [u8; 32] {
    TetraPow::from_seed(seed).compute()
}
