//! Zetahash: the final ratio-based diffusion stage of vault derivation.
//!
//! The tempered key is read as four 8-byte little-endian chunks. Each chunk is
//! scaled by a fixed ratio, and SHA-256 over (original ‖ scaled) contributes
//! eight bytes of the final seed.

use crate::hash::sha256;

/// Golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Ratio cycle applied to successive chunks: unity, φ, √2, √3, octave,
/// fourth (3:4), fifth (4:5), major third (5:4).
pub const RATIOS: [f64; 8] = [
    1.0,
    PHI,
    std::f64::consts::SQRT_2,
    1.732_050_807_568_877,
    2.0,
    0.75,
    0.8,
    1.25,
];

const CHUNKS: usize = 4;

/// Apply Zetahash to the first 32 bytes of `tempered_key`.
///
/// Chunks past the end of a short key are left zero.
pub fn zetahash(tempered_key: &[u8]) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, chunk) in tempered_key.chunks_exact(8).take(CHUNKS).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        let value = u64::from_le_bytes(word);
        let scaled = scale(value, RATIOS[i % RATIOS.len()]);

        let mut mix = [0u8; 16];
        mix[..8].copy_from_slice(&value.to_le_bytes());
        mix[8..].copy_from_slice(&scaled.to_le_bytes());
        let digest = sha256(&mix);

        seed[i * 8..(i + 1) * 8].copy_from_slice(&digest[..8]);
    }
    seed
}

/// `value × ratio` through f64, truncated. Products beyond `u64::MAX` saturate.
fn scale(value: u64, ratio: f64) -> u64 {
    (value as f64 * ratio) as u64
}
