//! Token amounts.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; one EXS is `EXS_UNIT` raw. Percentages are applied in
//! basis points so every treasury split stays exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Raw units per whole EXS.
pub const EXS_UNIT: u128 = 100_000_000;

/// Basis points in one whole (100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// An EXS amount, stored as raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole EXS to raw units.
    pub const fn from_exs(whole: u128) -> Self {
        Self(whole * EXS_UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn checked_mul(self, factor: u128) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// The share of this amount given by `bps` basis points (rounded down).
    pub fn share_bps(self, bps: u32) -> Self {
        Self(self.0.saturating_mul(bps as u128) / BPS_DENOMINATOR)
    }

    /// Split into `parts` equal pieces. Returns `None` if the amount does not
    /// divide evenly (or `parts` is zero), so no raw unit is ever lost.
    pub fn split_even(self, parts: u32) -> Option<Self> {
        if parts == 0 || self.0 % parts as u128 != 0 {
            return None;
        }
        Some(Self(self.0 / parts as u128))
    }

    /// Lossy conversion for reporting (stats, percentages).
    pub fn as_exs_f64(&self) -> f64 {
        self.0 as f64 / EXS_UNIT as f64
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08} EXS", self.0 / EXS_UNIT, self.0 % EXS_UNIT)
    }
}
