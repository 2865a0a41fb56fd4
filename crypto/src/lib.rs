//! Cryptographic primitives for the forge protocol.
//!
//! - **HPP-1** key stretching (PBKDF2-HMAC-SHA512) for vault tempering and mining
//! - **Tetra-PoW** 128-round nonlinear mixing
//! - **Zetahash** golden-ratio diffusion of the tempered key
//! - **Taproot** (BIP-341) key tweaking and bech32m address encoding
//! - The five-stage forge pipeline tying them together

pub mod error;
pub mod forge;
pub mod hash;
pub mod hpp1;
pub mod taproot;
pub mod tetra;
pub mod zetahash;

pub use error::CryptoError;
pub use forge::{
    bind_phrase, derive_vault, derive_vault_with, vault_from_trace, verify_vault,
    verify_vault_with, ForgeTrace, VaultResult, CANONICAL_PROPHECY, PHRASE_WORDS,
};
pub use hash::{sha256, sha256_multi, sha512, tagged_hash};
pub use hpp1::Hpp1;
pub use taproot::{
    decode_taproot_address, encode_taproot_address, internal_key_from_entropy,
    tweak_internal_key, validate_taproot_address, TaprootKeys,
};
pub use tetra::{tetra_pow, TetraPow};
pub use zetahash::zetahash;
