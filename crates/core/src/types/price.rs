//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so that line totals and order totals add
//! up exactly. On the wire (remote API and persisted cache) a price is a plain
//! JSON number, e.g. `49.99`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency (USD).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Subtract, flooring the result at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self((self.0 - other.0).max(Decimal::ZERO))
    }

    /// Whether the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::new(dec!(10)).times(2), Price::new(dec!(25)).times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(dec!(45)));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::new(dec!(45)).to_string(), "$45.00");
        assert_eq!(Price::from_cents(4999).to_string(), "$49.99");
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let p = Price::new(dec!(5)).saturating_sub(Price::new(dec!(10)));
        assert_eq!(p, Price::ZERO);
    }

    #[test]
    fn test_wire_format_is_number() {
        let json = serde_json::to_string(&Price::from_cents(4999)).unwrap();
        assert_eq!(json, "49.99");
        let parsed: Price = serde_json::from_str("129").unwrap();
        assert_eq!(parsed, Price::new(dec!(129)));
    }
}
