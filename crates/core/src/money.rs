//! Money - Decimal amounts normalised to pence
//!
//! Every `Money` is rounded to the nearest pence when it is created, and every
//! arithmetic result is rounded again. Equality and ordering therefore always
//! compare whole pence.
//!
//! All arithmetic is checked: an overflow yields `None`, never a panic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places kept (pounds and pence)
const PENCE_DP: u32 = 2;

/// Errors that can occur when building money values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid money value: {0:?}")]
    Invalid(String),
}

/// An amount of money in pounds, held to the nearest pence.
///
/// # Example
/// ```
/// use auctionhouse_core::Money;
///
/// let price: Money = "13.135".parse().unwrap();
/// assert_eq!(price.to_string(), "13.14");
/// assert_eq!(price, Money::from_pence(1314));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero pounds
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create Money from a decimal number of pounds, rounding to the nearest pence.
    pub fn new(pounds: Decimal) -> Self {
        Self(normalise(pounds))
    }

    /// Create Money from a whole number of pence
    pub fn from_pence(pence: i64) -> Self {
        Self(Decimal::new(pence, PENCE_DP))
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Sum, or `None` on overflow
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money::new)
    }

    /// Difference, or `None` on overflow
    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money::new)
    }

    /// Add `percent` per cent on top of this amount: `value * (1 + percent / 100)`.
    ///
    /// Returns `None` if the result overflows.
    pub fn checked_add_percent(&self, percent: Decimal) -> Option<Money> {
        self.scale_by(Decimal::ONE_HUNDRED.checked_add(percent)?)
    }

    /// Take `percent` per cent off this amount: `value * (1 - percent / 100)`.
    ///
    /// Returns `None` if the result overflows.
    pub fn checked_sub_percent(&self, percent: Decimal) -> Option<Money> {
        self.scale_by(Decimal::ONE_HUNDRED.checked_sub(percent)?)
    }

    fn scale_by(&self, percent_of_value: Decimal) -> Option<Money> {
        let factor = percent_of_value.checked_div(Decimal::ONE_HUNDRED)?;
        self.0.checked_mul(factor).map(Money::new)
    }
}

fn normalise(pounds: Decimal) -> Decimal {
    pounds.round_dp_with_strategy(PENCE_DP, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money::new)
            .map_err(|_| MoneyError::Invalid(s.to_string()))
    }
}

impl From<Decimal> for Money {
    fn from(pounds: Decimal) -> Self {
        Self::new(pounds)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}
