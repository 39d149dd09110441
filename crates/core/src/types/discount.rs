//! Coupon discounts.
//!
//! A discount is either a flat amount or a fraction of the cart subtotal.
//! The two are distinct variants so a coupon worth exactly one dollar can
//! never be mistaken for a 100% discount.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::Price;

/// A coupon discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Fixed amount off the subtotal.
    Flat(Price),
    /// Fraction of the subtotal, stored as `0..=1`.
    Percentage(Decimal),
}

impl Discount {
    /// Amount taken off the given subtotal, rounded to cents.
    ///
    /// Not capped: callers floor the resulting total at zero.
    #[must_use]
    pub fn amount_off(&self, subtotal: Price) -> Price {
        match self {
            Self::Flat(amount) => *amount,
            Self::Percentage(fraction) => Price::new((subtotal.amount() * fraction).round_dp(2)),
        }
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(amount) => write!(f, "{amount} OFF"),
            Self::Percentage(fraction) => {
                write!(f, "{}% OFF", (fraction * Decimal::ONE_HUNDRED).normalize())
            }
        }
    }
}

/// Promotional codes accepted at checkout: (code, percent off or cents off).
pub const PROMO_CODES: &[(&str, PromoValue)] = &[
    ("AUDIO25", PromoValue::PercentOff(25)),
    ("WELCOME15", PromoValue::PercentOff(15)),
    ("PWRUP10", PromoValue::CentsOff(1000)),
    ("SAVE10", PromoValue::PercentOff(10)),
];

/// Compile-time value of a promotional code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoValue {
    PercentOff(u8),
    CentsOff(i64),
}

impl PromoValue {
    fn discount(self) -> Discount {
        match self {
            Self::PercentOff(p) => Discount::Percentage(Decimal::from(p) / Decimal::ONE_HUNDRED),
            Self::CentsOff(cents) => Discount::Flat(Price::from_cents(cents)),
        }
    }
}

/// Look up a promotional code, ignoring case and surrounding whitespace.
#[must_use]
pub fn promo_code(code: &str) -> Option<(String, Discount)> {
    let normalized = code.trim().to_uppercase();
    PROMO_CODES
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(known, value)| ((*known).to_owned(), value.discount()))
}
