//! Taproot (BIP340/341) key derivation and bech32m address encoding.
//!
//! Address format: bech32m(hrp, [witness_version = 1] ‖ base32(x-only output key)).
//! HRP: `bc` (mainnet), `tb` (testnet), `bcrt` (regtest).

use std::sync::OnceLock;

use bech32::{u5, FromBase32, ToBase32, Variant};
use secp256k1::{All, Keypair, Scalar, Secp256k1, SecretKey, XOnlyPublicKey};

use crate::hash::{sha256, sha256_multi, tagged_hash};
use crate::CryptoError;
use forge_types::Network;

/// Witness version for Taproot outputs.
pub const TAPROOT_WITNESS_VERSION: u8 = 1;

/// Re-hash attempts before giving up on finding a valid scalar.
const MAX_KEY_ATTEMPTS: u32 = 256;

fn secp() -> &'static Secp256k1<All> {
    static CONTEXT: OnceLock<Secp256k1<All>> = OnceLock::new();
    CONTEXT.get_or_init(Secp256k1::new)
}

/// An x-only internal key tweaked into a Taproot output key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaprootKeys {
    pub internal_key: [u8; 32],
    pub output_key: [u8; 32],
    /// SHA-256(internal_key ‖ commitment); committed as the BIP341 merkle root.
    pub tweak_hash: [u8; 32],
}

/// Derive a deterministic internal key from 32 bytes of entropy.
///
/// The secret scalar is SHA-256(entropy). In the negligible case that is not a
/// valid secp256k1 scalar, it is re-hashed together with an attempt counter.
pub fn internal_key_from_entropy(entropy: &[u8; 32]) -> Result<XOnlyPublicKey, CryptoError> {
    let mut candidate = sha256(entropy);
    for attempt in 0..MAX_KEY_ATTEMPTS {
        if let Ok(secret) = SecretKey::from_slice(&candidate) {
            let keypair = Keypair::from_secret_key(secp(), &secret);
            let (xonly, _parity) = XOnlyPublicKey::from_keypair(&keypair);
            return Ok(xonly);
        }
        candidate = sha256_multi(&[&candidate, &attempt.to_le_bytes()]);
    }
    Err(CryptoError::KeyDerivation(
        "no valid secret scalar found for entropy".into(),
    ))
}

/// Tweak `internal` with a commitment to `commitment`.
///
/// `tweak_hash = SHA-256(internal ‖ commitment)` is used as the script-tree
/// root, so the output key is `P + TaggedHash("TapTweak", P ‖ tweak_hash)·G`.
pub fn tweak_internal_key(
    internal: &XOnlyPublicKey,
    commitment: &[u8],
) -> Result<TaprootKeys, CryptoError> {
    let internal_bytes = internal.serialize();
    let tweak_hash = sha256_multi(&[&internal_bytes, commitment]);
    let tap_tweak = tagged_hash("TapTweak", &[&internal_bytes, &tweak_hash]);

    let scalar = Scalar::from_be_bytes(tap_tweak)
        .map_err(|e| CryptoError::KeyDerivation(format!("tap tweak out of range: {e}")))?;
    let (output, _parity) = internal
        .add_tweak(secp(), &scalar)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok(TaprootKeys {
        internal_key: internal_bytes,
        output_key: output.serialize(),
        tweak_hash,
    })
}

/// Encode an x-only output key as a bech32m Taproot address.
pub fn encode_taproot_address(
    output_key: &[u8; 32],
    network: Network,
) -> Result<String, CryptoError> {
    let version = u5::try_from_u8(TAPROOT_WITNESS_VERSION)
        .map_err(|e| CryptoError::AddressEncoding(e.to_string()))?;
    let mut data = vec![version];
    data.extend(output_key.to_base32());
    bech32::encode(network.hrp(), data, Variant::Bech32m)
        .map_err(|e| CryptoError::AddressEncoding(e.to_string()))
}

/// Decode a Taproot address into its network and 32-byte output key.
pub fn decode_taproot_address(address: &str) -> Result<(Network, [u8; 32]), CryptoError> {
    let (hrp, data, variant) =
        bech32::decode(address).map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;

    let network = Network::from_hrp(&hrp)
        .ok_or_else(|| CryptoError::InvalidAddress(format!("unknown hrp: {hrp}")))?;

    if variant != Variant::Bech32m {
        return Err(CryptoError::InvalidAddress(
            "witness v1 requires bech32m checksum".into(),
        ));
    }

    let (version, program) = data
        .split_first()
        .ok_or_else(|| CryptoError::InvalidAddress("empty data part".into()))?;
    if version.to_u8() != TAPROOT_WITNESS_VERSION {
        return Err(CryptoError::InvalidAddress(format!(
            "witness version {} is not taproot",
            version.to_u8()
        )));
    }

    let program =
        Vec::<u8>::from_base32(program).map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
    let output_key: [u8; 32] = program.as_slice().try_into().map_err(|_| {
        CryptoError::InvalidAddress(format!("program is {} bytes, expected 32", program.len()))
    })?;

    Ok((network, output_key))
}

/// Whether `address` is a well-formed Taproot address with a valid x-only key.
pub fn validate_taproot_address(address: &str) -> bool {
    match decode_taproot_address(address) {
        Ok((_, key)) => XOnlyPublicKey::from_slice(&key).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internal() -> XOnlyPublicKey {
        internal_key_from_entropy(&[7u8; 32]).unwrap()
    }

    #[test]
    fn internal_key_is_deterministic() {
        assert_eq!(internal(), internal());
        assert_ne!(internal(), internal_key_from_entropy(&[8u8; 32]).unwrap());
    }

    #[test]
    fn tweak_changes_key() {
        let keys = tweak_internal_key(&internal(), &[1u8; 32]).unwrap();
        assert_ne!(keys.internal_key, keys.output_key);
        assert_eq!(keys.internal_key, internal().serialize());
    }

    #[test]
    fn tweak_depends_on_commitment() {
        let a = tweak_internal_key(&internal(), &[1u8; 32]).unwrap();
        let b = tweak_internal_key(&internal(), &[2u8; 32]).unwrap();
        assert_ne!(a.output_key, b.output_key);
        assert_ne!(a.tweak_hash, b.tweak_hash);
    }

    #[test]
    fn tweak_hash_commits_to_internal_key() {
        let keys = tweak_internal_key(&internal(), b"commitment").unwrap();
        assert_eq!(
            keys.tweak_hash,
            sha256_multi(&[&internal().serialize(), b"commitment"])
        );
    }

    #[test]
    fn tweak_matches_manual_point_addition() {
        let keys = tweak_internal_key(&internal(), &[3u8; 32]).unwrap();
        let t = tagged_hash("TapTweak", &[&keys.internal_key, &keys.tweak_hash]);
        let scalar = Scalar::from_be_bytes(t).unwrap();
        let (expected, _) = internal().add_tweak(secp(), &scalar).unwrap();
        assert_eq!(keys.output_key, expected.serialize());
    }

    #[test]
    fn encode_decode_roundtrip_all_networks() {
        let key = tweak_internal_key(&internal(), &[1u8; 32]).unwrap().output_key;
        for network in Network::ALL {
            let address = encode_taproot_address(&key, network).unwrap();
            assert!(address.starts_with(&format!("{}1p", network.hrp())));
            let (decoded_net, decoded_key) = decode_taproot_address(&address).unwrap();
            assert_eq!(decoded_net, network);
            assert_eq!(decoded_key, key);
            assert!(validate_taproot_address(&address));
        }
    }

    #[test]
    fn mainnet_address_length() {
        let key = internal().serialize();
        let address = encode_taproot_address(&key, Network::Mainnet).unwrap();
        // "bc" + "1" + 1 version char + 52 program chars + 6 checksum chars
        assert_eq!(address.len(), 62);
    }

    #[test]
    fn bip350_test_vector_decodes() {
        let address = "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0";
        let (network, key) = decode_taproot_address(address).unwrap();
        assert_eq!(network, Network::Mainnet);
        assert_eq!(
            hex::encode(key),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn bech32_checksum_rejected_for_v1() {
        let key = internal().serialize();
        let mut data = vec![u5::try_from_u8(1).unwrap()];
        data.extend(key.to_base32());
        let address = bech32::encode("bc", data, Variant::Bech32).unwrap();
        assert!(decode_taproot_address(&address).is_err());
    }

    #[test]
    fn witness_v0_rejected() {
        let key = internal().serialize();
        let mut data = vec![u5::try_from_u8(0).unwrap()];
        data.extend(key.to_base32());
        let address = bech32::encode("bc", data, Variant::Bech32m).unwrap();
        assert!(!validate_taproot_address(&address));
    }

    #[test]
    fn garbage_rejected() {
        assert!(!validate_taproot_address(""));
        assert!(!validate_taproot_address("bc1ptest"));
        assert!(!validate_taproot_address("ltc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0"));
    }
}
