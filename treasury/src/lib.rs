//! The protocol treasury.
//!
//! Every accepted forge pays 15% of its reward into the treasury as three
//! equal mini-outputs that unlock immediately, after one month (4,320 blocks)
//! and after two months (8,640 blocks). The ledger tracks which of those
//! outputs are spendable at the current height, collects the optional King's
//! Tithe and treasury fees, gates reward claims on proof difficulty and the
//! supply cap, and records distributions.
//!
//! A [`Treasury`] is an explicit value owned by the caller; there is no global
//! instance. All state sits behind a single `RwLock`.

pub mod address;
pub mod config;
pub mod error;
pub mod fee;
pub mod ledger;
pub mod output;
pub mod snapshot;
pub mod stats;

pub use address::validate_recipient;
pub use config::TreasuryConfig;
pub use error::TreasuryError;
pub use fee::{forge_fee, FeeSchedule};
pub use ledger::{Claim, Distribution, FeeReceipt, ForgeResult, Treasury};
pub use output::{MiniOutput, OutputId, OutputKind};
pub use snapshot::TreasurySnapshot;
pub use stats::{RuneDistribution, SupplyEstimate, TreasuryStats};
