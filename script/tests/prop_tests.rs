use proptest::prelude::*;

use forge_script::{build_script, validate_script, TimeLockScript};
use forge_types::BlockHeight;

proptest! {
    /// Any non-zero height survives build -> validate.
    #[test]
    fn height_roundtrip(height in 1u32.., hash in prop::array::uniform20(0u8..)) {
        let script = build_script(height, &hash).unwrap();
        prop_assert_eq!(validate_script(script.script()).unwrap(), height);
    }

    /// Built scripts always parse back to the same value.
    #[test]
    fn parse_roundtrip(height in 1u32.., hash in prop::array::uniform20(0u8..)) {
        let script = build_script(height, &hash).unwrap();
        prop_assert_eq!(TimeLockScript::parse(script.script()).unwrap(), script);
    }

    /// Spendability flips exactly at the lock height.
    #[test]
    fn spendable_at_lock(height in 1u32.., now in 0u32..) {
        let script = build_script(height, &[0u8; 20]).unwrap();
        prop_assert_eq!(script.is_spendable(BlockHeight::new(now)), now >= height);
    }

    /// Arbitrary bytes never panic the validator.
    #[test]
    fn validate_never_panics(bytes in prop::collection::vec(0u8.., 0..64)) {
        let _ = validate_script(&bytes);
        let _ = TimeLockScript::parse(&bytes);
    }
}
