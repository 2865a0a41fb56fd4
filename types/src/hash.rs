//! Fixed-size digest type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte digest (Tetra-PoW output, tweak hash, proof hash).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash32([u8; 32]);

impl Hash32 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a slice; `None` unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The first eight bytes read as a little-endian integer.
    ///
    /// This is the value compared against a mining difficulty target.
    pub fn leading_u64(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(word)
    }

    /// Number of leading zero bytes.
    pub fn leading_zero_bytes(&self) -> usize {
        self.0.iter().take_while(|&&b| b == 0).count()
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_u64_is_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        bytes[7] = 0x80;
        assert_eq!(Hash32::new(bytes).leading_u64(), 0x8000_0000_0000_0001);
    }

    #[test]
    fn leading_zero_bytes_counts_prefix_only() {
        let mut bytes = [0u8; 32];
        bytes[2] = 1;
        bytes[5] = 0;
        assert_eq!(Hash32::new(bytes).leading_zero_bytes(), 2);
        assert_eq!(Hash32::ZERO.leading_zero_bytes(), 32);
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(Hash32::from_slice(&[0u8; 31]).is_none());
        assert!(Hash32::from_slice(&[0u8; 33]).is_none());
        assert!(Hash32::from_slice(&[7u8; 32]).is_some());
    }

    #[test]
    fn display_is_full_hex() {
        let h = Hash32::new([0xab; 32]);
        assert_eq!(h.to_string().len(), 64);
        assert!(h.to_string().starts_with("abab"));
    }
}
