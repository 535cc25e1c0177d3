//! # Money
//!
//! Every amount in Tally is a whole number of cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.price_cents ──► Money(250) ──► JSON 250 ──► UI "$2.50"       │
//! │                               │                                         │
//! │                               └──► receipt "$2.50"                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No floats anywhere: a line total is `unit price × quantity` in integer
//! arithmetic and a sale total is a plain sum of those. Both are checked;
//! a quantity large enough to overflow `i64` yields `None`, which the
//! validators turn into a 400.
//!
//! ```rust
//! use tally_core::money::Money;
//!
//! let water = Money::from_cents(250);
//! assert_eq!(water.checked_multiply(3).map(|m| m.cents()), Some(750));
//! assert_eq!(water.checked_multiply(i64::MAX), None);
//! assert_eq!(water.to_string(), "$2.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in cents. Negative values only appear as differences.
///
/// Transparent on the wire (`250`) and in SQLite (INTEGER).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Unit price times a line quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply(&self, quantity: i64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, rhs: Money) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds up amounts, `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }
}

/// `$7.50`, `-$0.25`. The receipt prints amounts this way.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}
