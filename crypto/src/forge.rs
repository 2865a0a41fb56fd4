//! Proof-of-Forge: the five-stage derivation from a 13-word phrase to a vault address.
//!
//! 1. Phrase binding: SHA-512 of the concatenated words
//! 2. Round mixing: Tetra-PoW over the first 32 bytes
//! 3. Tempering: HPP-1 (PBKDF2-HMAC-SHA512) to 64 bytes
//! 4. Zetahash: ratio diffusion to a 32-byte final seed
//! 5. Taproot: deterministic internal key from the final seed, tweaked with
//!    a commitment to the phrase hash, encoded as a bech32m address
//!
//! Every stage is deterministic, so the same phrase, salt and network always
//! yield the same address.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hash::sha512;
use crate::hpp1::Hpp1;
use crate::taproot::{encode_taproot_address, internal_key_from_entropy, tweak_internal_key};
use crate::tetra::tetra_pow;
use crate::zetahash::zetahash;
use crate::CryptoError;
use forge_types::params::DEFAULT_FORGE_SALT;
use forge_types::Network;

/// Words in a secret phrase.
pub const PHRASE_WORDS: usize = 13;

/// The canonical 13-word prophecy axiom.
pub const CANONICAL_PROPHECY: [&str; PHRASE_WORDS] = [
    "sword", "legend", "pull", "magic", "kingdom", "artist", "stone", "destroy", "forget", "fire",
    "steel", "honey", "question",
];

/// Outputs of stages 1–4, kept for verification. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ForgeTrace {
    /// Stage 1: SHA-512 of the concatenated words.
    pub prophecy_hash: [u8; 64],
    /// Stage 2: Tetra-PoW digest.
    pub mix_hash: [u8; 32],
    /// Stage 3: HPP-1 output.
    pub tempered_key: [u8; 64],
    /// Stage 4: Zetahash output.
    pub final_seed: [u8; 32],
}

impl ForgeTrace {
    /// Run stages 1–4.
    pub fn compute<S: AsRef<str>>(
        phrase: &[S],
        salt: Option<&[u8]>,
        hpp1: &Hpp1,
    ) -> Result<Self, CryptoError> {
        if phrase.len() != PHRASE_WORDS {
            return Err(CryptoError::InvalidPhraseLength {
                expected: PHRASE_WORDS,
                actual: phrase.len(),
            });
        }

        let prophecy_hash = bind_phrase(phrase);

        let mut mix_seed = [0u8; 32];
        mix_seed.copy_from_slice(&prophecy_hash[..32]);
        let mix_hash = tetra_pow(&mix_seed);
        mix_seed.zeroize();

        let salt = salt.unwrap_or(DEFAULT_FORGE_SALT.as_bytes());
        let mut tempered_key = [0u8; 64];
        hpp1.stretch_into(&mix_hash, salt, &mut tempered_key);

        let final_seed = zetahash(&tempered_key);

        debug!(rounds = hpp1.rounds(), "forge stages 1-4 complete");

        Ok(Self {
            prophecy_hash,
            mix_hash,
            tempered_key,
            final_seed,
        })
    }

    /// First 32 bytes of the stage-1 hash.
    pub fn phrase_hash(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.prophecy_hash[..32]);
        out
    }
}

impl fmt::Debug for ForgeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeTrace")
            .field("prophecy_hash", &hex::encode(&self.prophecy_hash[..8]))
            .field("mix_hash", &"<redacted>")
            .field("tempered_key", &"<redacted>")
            .field("final_seed", &"<redacted>")
            .finish()
    }
}

/// A derived one-time vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultResult {
    /// x-only internal key.
    pub internal_key: [u8; 32],
    /// x-only tweaked output key (the address program).
    pub output_key: [u8; 32],
    /// SHA-256(internal_key ‖ phrase_hash).
    pub tweak_hash: [u8; 32],
    /// bech32m Taproot address.
    pub address: String,
    /// First 32 bytes of the phrase binding hash.
    pub phrase_hash: [u8; 32],
    pub network: Network,
}

/// Stage 1: SHA-512 over the words concatenated with no separator.
pub fn bind_phrase<S: AsRef<str>>(phrase: &[S]) -> [u8; 64] {
    let concatenated: String = phrase.iter().map(AsRef::as_ref).collect();
    sha512(concatenated.as_bytes())
}

/// Derive a vault address from a 13-word phrase with full-strength HPP-1.
///
/// `salt` defaults to the protocol forge salt when `None`.
pub fn derive_vault<S: AsRef<str>>(
    phrase: &[S],
    salt: Option<&[u8]>,
    network: Network,
) -> Result<VaultResult, CryptoError> {
    derive_vault_with(phrase, salt, network, &Hpp1::STANDARD)
}

/// Derive a vault address with an explicit HPP-1 configuration.
pub fn derive_vault_with<S: AsRef<str>>(
    phrase: &[S],
    salt: Option<&[u8]>,
    network: Network,
    hpp1: &Hpp1,
) -> Result<VaultResult, CryptoError> {
    let trace = ForgeTrace::compute(phrase, salt, hpp1)?;
    vault_from_trace(&trace, network)
}

/// Stage 5: turn a completed trace into a Taproot vault.
pub fn vault_from_trace(trace: &ForgeTrace, network: Network) -> Result<VaultResult, CryptoError> {
    let phrase_hash = trace.phrase_hash();
    let internal = internal_key_from_entropy(&trace.final_seed)?;
    let keys = tweak_internal_key(&internal, &phrase_hash)?;
    let address = encode_taproot_address(&keys.output_key, network)?;

    debug!(%network, %address, "vault derived");

    Ok(VaultResult {
        internal_key: keys.internal_key,
        output_key: keys.output_key,
        tweak_hash: keys.tweak_hash,
        address,
        phrase_hash,
        network,
    })
}

/// Re-derive with full-strength HPP-1 and compare against an expected address.
pub fn verify_vault<S: AsRef<str>>(
    phrase: &[S],
    salt: Option<&[u8]>,
    network: Network,
    expected_address: &str,
) -> Result<bool, CryptoError> {
    verify_vault_with(phrase, salt, network, &Hpp1::STANDARD, expected_address)
}

/// [`verify_vault`] with an explicit HPP-1 configuration.
pub fn verify_vault_with<S: AsRef<str>>(
    phrase: &[S],
    salt: Option<&[u8]>,
    network: Network,
    hpp1: &Hpp1,
    expected_address: &str,
) -> Result<bool, CryptoError> {
    let vault = derive_vault_with(phrase, salt, network, hpp1)?;
    Ok(vault.address == expected_address)
}
