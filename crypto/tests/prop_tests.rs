use proptest::prelude::*;

use forge_crypto::{
    decode_taproot_address, encode_taproot_address, internal_key_from_entropy, tetra_pow,
    tweak_internal_key, validate_taproot_address, zetahash, Hpp1, TetraPow, PHRASE_WORDS,
};
use forge_types::Network;

fn network() -> impl Strategy<Value = Network> {
    prop_oneof![
        Just(Network::Mainnet),
        Just(Network::Testnet),
        Just(Network::Regtest),
    ]
}

proptest! {
    /// Tetra-PoW is a pure function of its seed.
    #[test]
    fn tetra_pow_deterministic(seed in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(tetra_pow(&seed), tetra_pow(&seed));
    }

    /// Slice and array constructors agree.
    #[test]
    fn tetra_slice_matches_array(seed in prop::array::uniform32(0u8..)) {
        let from_slice = TetraPow::new(&seed).unwrap().compute();
        prop_assert_eq!(from_slice, tetra_pow(&seed));
    }

    /// Any seed length other than 32 is rejected.
    #[test]
    fn tetra_rejects_bad_length(seed in prop::collection::vec(0u8.., 0..64)) {
        prop_assume!(seed.len() != 32);
        prop_assert!(TetraPow::new(&seed).is_err());
    }

    /// Zetahash only reads the first 32 bytes.
    #[test]
    fn zetahash_ignores_tail(
        head in prop::array::uniform32(0u8..),
        tail_a in prop::array::uniform32(0u8..),
        tail_b in prop::array::uniform32(0u8..),
    ) {
        let mut a = head.to_vec();
        a.extend_from_slice(&tail_a);
        let mut b = head.to_vec();
        b.extend_from_slice(&tail_b);
        prop_assert_eq!(zetahash(&a), zetahash(&b));
    }

    /// HPP-1 output length always matches the request.
    #[test]
    fn hpp1_output_length(len in 1usize..128, secret in prop::collection::vec(0u8.., 0..48)) {
        let hpp1 = Hpp1::new(2).unwrap();
        prop_assert_eq!(hpp1.stretch(&secret, b"salt", len).len(), len);
    }

    /// Every valid output key survives address encoding on every network.
    #[test]
    fn address_roundtrip(entropy in prop::array::uniform32(0u8..), net in network()) {
        let internal = internal_key_from_entropy(&entropy).unwrap();
        let keys = tweak_internal_key(&internal, &[0u8; 32]).unwrap();
        let address = encode_taproot_address(&keys.output_key, net).unwrap();
        prop_assert!(validate_taproot_address(&address));
        let (decoded_net, key) = decode_taproot_address(&address).unwrap();
        prop_assert_eq!(decoded_net, net);
        prop_assert_eq!(key, keys.output_key);
    }

    /// Different commitments tweak to different output keys.
    #[test]
    fn tweak_commitment_binding(
        entropy in prop::array::uniform32(0u8..),
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        prop_assume!(a != b);
        let internal = internal_key_from_entropy(&entropy).unwrap();
        let ka = tweak_internal_key(&internal, &a).unwrap();
        let kb = tweak_internal_key(&internal, &b).unwrap();
        prop_assert_ne!(ka.output_key, kb.output_key);
    }

    /// Phrases of the wrong length never derive a vault.
    #[test]
    fn wrong_phrase_length_rejected(len in 0usize..30) {
        prop_assume!(len != PHRASE_WORDS);
        let phrase = vec!["forge"; len];
        let hpp1 = Hpp1::new(1).unwrap();
        prop_assert!(forge_crypto::derive_vault_with(&phrase, None, Network::Mainnet, &hpp1).is_err());
    }
}
