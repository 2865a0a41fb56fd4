//! Difficulty arithmetic over Tetra-PoW digests.

use forge_types::Hash32;

/// The value compared against a mining target: first eight bytes, little-endian.
pub fn hash_value(hash: &Hash32) -> u64 {
    hash.leading_u64()
}

/// Strictly-below comparison used by the nonce search.
pub fn meets_target(hash: &Hash32, target: u64) -> bool {
    hash_value(hash) < target
}

/// Whether the first `required` bytes of the hash are all zero.
pub fn meets_leading_zero_bytes(hash: &Hash32, required: usize) -> bool {
    hash.leading_zero_bytes() >= required
}

/// Mean number of attempts needed to hit `target`, assuming uniform digests.
pub fn expected_attempts(target: u64) -> f64 {
    if target == 0 {
        return f64::INFINITY;
    }
    (u64::MAX as f64 + 1.0) / target as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_with_prefix(prefix: &[u8]) -> Hash32 {
        let mut bytes = [0xFFu8; 32];
        bytes[..prefix.len()].copy_from_slice(prefix);
        Hash32::new(bytes)
    }

    #[test]
    fn test_value_is_little_endian() {
        let hash = hash_with_prefix(&[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(hash_value(&hash), 1);
    }

    #[test]
    fn test_target_is_strict() {
        let hash = hash_with_prefix(&[10, 0, 0, 0, 0, 0, 0, 0]);
        assert!(meets_target(&hash, 11));
        assert!(!meets_target(&hash, 10));
        assert!(!meets_target(&hash, 0));
    }

    #[test]
    fn test_leading_zero_bytes() {
        let hash = hash_with_prefix(&[0, 0, 0, 0, 7]);
        assert!(meets_leading_zero_bytes(&hash, 4));
        assert!(!meets_leading_zero_bytes(&hash, 5));
        assert!(meets_leading_zero_bytes(&hash, 0));
    }

    #[test]
    fn test_expected_attempts() {
        assert_eq!(expected_attempts(1u64 << 63), 2.0);
        assert!(expected_attempts(0).is_infinite());
    }
}
