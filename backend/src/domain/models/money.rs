//! Money amounts stored as integer minor units.
//!
//! All allocation arithmetic happens on `Money` so that rounding is explicit
//! and the sum of allocation lines can be reconciled exactly. Conversion to
//! and from the `f64` amounts used on the wire goes through [`Currency`],
//! which knows how many decimal places the minor unit has.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// An amount in minor currency units (kopecks, cents, or whole units for
/// currencies without a fractional part)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `self * percent / 100`, rounded half-up to the nearest minor unit.
    ///
    /// Only meaningful for non-negative amounts, which is all the allocation
    /// engine ever works with.
    pub fn percent_of(&self, percent: u32) -> Money {
        let scaled = self.0 as i128 * percent as i128;
        Money(((scaled + 50) / 100) as i64)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minor units", self.0)
    }
}

/// Currency the service books income in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, only used for display and logging
    pub code: String,
    /// Number of decimal places in the minor unit (2 for RUB/USD, 0 for JPY)
    pub decimals: u32,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            code: "RUB".to_string(),
            decimals: 2,
        }
    }
}

impl Currency {
    pub fn new(code: impl Into<String>, decimals: u32) -> Self {
        Self {
            code: code.into(),
            decimals,
        }
    }

    /// Number of minor units in one major unit
    pub fn scale(&self) -> i64 {
        10_i64.pow(self.decimals)
    }

    /// Convert a major-unit amount to minor units, rounding half-up.
    ///
    /// Returns `None` for NaN, infinities and values that do not fit in `i64`.
    pub fn to_minor(&self, amount: f64) -> Option<Money> {
        if !amount.is_finite() {
            return None;
        }
        let scaled = (amount * self.scale() as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(scaled as i64))
    }

    pub fn to_major(&self, money: Money) -> f64 {
        money.minor() as f64 / self.scale() as f64
    }

    /// Human readable amount, e.g. `1234.50 RUB`
    pub fn format(&self, money: Money) -> String {
        format!(
            "{:.*} {}",
            self.decimals as usize,
            self.to_major(money),
            self.code
        )
    }
}
