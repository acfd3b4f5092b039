//! Decimal amount type for token values.
//!
//! Uses `rust_decimal` internally so accrual math stays exact: a rate of
//! `0.0001` per second over an hour must come out as `0.36`, not a float
//! approximation. Unlike display output, which rounds to three fractional
//! digits, intermediate values keep their full precision.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// A token amount (or per-second rate) in the token's natural unit.
///
/// Wraps `rust_decimal::Decimal` without rescaling, suitable for monetary
/// calculations where sub-display precision matters. Display rounding is the
/// formatter's job, not this type's.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use streams_dashboard::Amount;
///
/// let rate = Amount::from_str("0.0001").unwrap();
/// assert_eq!((rate * 3600).to_string(), "0.3600");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount` from a `Decimal`.
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to `dp` fractional digits, half away from zero.
    ///
    /// This is the rounding the display formatter applies; bankers' rounding
    /// (the `rust_decimal` default) would turn `4.2005` into `4.200` where
    /// the dashboard historically showed `4.201`.
    pub fn round_dp(&self, dp: u32) -> Self {
        Amount(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Scaling by a whole number of seconds (elapsed time or a period length).
impl Mul<u64> for Amount {
    type Output = Self;

    fn mul(self, rhs: u64) -> Self::Output {
        Amount(self.0 * Decimal::from(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_preserves_scale() {
        let a = Amount::from_str("1.0").unwrap();
        assert_eq!(a.to_string(), "1.0");

        let a = Amount::from_str("0.0001").unwrap();
        assert_eq!(a.to_string(), "0.0001");

        let a = Amount::from_str("  2.5  ").unwrap();
        assert_eq!(a.to_string(), "2.5");
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_addition_is_exact() {
        let a = Amount::from_str("1.2").unwrap();
        let b = Amount::from_str("0.0005").unwrap();
        let c = Amount::from_str("3.0").unwrap();

        let sum = a + b + c;
        assert_eq!(sum, Amount::from_str("4.2005").unwrap());
    }

    #[test]
    fn test_mul_by_seconds() {
        let rate = Amount::from_str("0.0001").unwrap();
        assert_eq!(rate * 3600, Amount::from_str("0.36").unwrap());
        assert_eq!(rate * 0, Amount::ZERO);
    }

    #[test]
    fn test_round_dp_half_away_from_zero() {
        let a = Amount::from_str("4.2005").unwrap();
        assert_eq!(a.round_dp(3), Amount::from_str("4.201").unwrap());

        let b = Amount::from_str("0.0012").unwrap();
        assert_eq!(b.round_dp(3), Amount::from_str("0.001").unwrap());
    }

    #[test]
    fn test_sign_queries() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_negative());
        assert!(Amount::from_str("-0.5").unwrap().is_negative());
        assert!(!Amount::from_str("0.5").unwrap().is_negative());
    }
}
