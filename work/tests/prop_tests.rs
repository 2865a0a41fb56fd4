use proptest::prelude::*;

use forge_crypto::Hpp1;
use forge_types::Hash32;
use forge_work::{meets_leading_zero_bytes, meets_target, verify_proof, Miner, WorkGenerator};

fn miner() -> Miner {
    Miner::new(Hpp1::new(1).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Mined proofs always pass their own validation.
    #[test]
    fn mined_proof_always_valid(data in prop::collection::vec(0u8.., 0..64)) {
        let miner = miner();
        let proof = miner.mine(&data, u64::MAX / 4);
        prop_assert!(verify_proof(&miner, &data, &proof));
    }

    /// Parallel generation produces proofs the sequential validator accepts.
    #[test]
    fn generated_proof_always_valid(data in prop::collection::vec(0u8.., 0..64)) {
        let generator = WorkGenerator::new(miner());
        let proof = generator.generate(&data, u64::MAX / 4).unwrap();
        prop_assert!(verify_proof(generator.miner(), &data, &proof));
    }

    /// The target comparison is strict.
    #[test]
    fn target_is_strict(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash32::new(bytes);
        let value = hash.leading_u64();
        prop_assert!(!meets_target(&hash, value));
        if value < u64::MAX {
            prop_assert!(meets_target(&hash, value + 1));
        }
    }

    /// Zero-byte requirements are monotone.
    #[test]
    fn leading_zero_monotone(bytes in prop::array::uniform32(0u8..), n in 0usize..32) {
        let hash = Hash32::new(bytes);
        if meets_leading_zero_bytes(&hash, n + 1) {
            prop_assert!(meets_leading_zero_bytes(&hash, n));
        }
    }
}
