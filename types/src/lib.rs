//! Fundamental types for the forge protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! fixed-point amounts, block heights, 32-byte digests, network selection,
//! protocol parameters, and the top-level error taxonomy.

pub mod amount;
pub mod error;
pub mod hash;
pub mod height;
pub mod network;
pub mod params;

pub use amount::{Amount, EXS_UNIT};
pub use error::ForgeError;
pub use hash::Hash32;
pub use height::BlockHeight;
pub use network::Network;
pub use params::{ForgeParams, ParamsError};
