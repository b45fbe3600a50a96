//! Money type with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.
//! The system is single-currency; amounts are normalized to two
//! fraction digits using banker's rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fraction digits stored for monetary amounts.
const SCALE: u32 = 2;

/// A monetary amount with two-decimal precision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a Money value, normalizing to two fraction digits.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointNearestEven))
    }

    /// Returns the inner decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Adds another amount, failing on overflow.
    #[must_use]
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts another amount, failing on overflow.
    #[must_use]
    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Remaining capacity toward a target: `needed - received`, floored at zero.
    #[must_use]
    pub fn remaining(needed: Self, received: Self) -> Self {
        if received.0 >= needed.0 {
            Self::ZERO
        } else {
            Self(needed.0 - received.0)
        }
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_normalizes_scale() {
        assert_eq!(Money::new(dec!(10.005)).amount(), dec!(10.00));
        assert_eq!(Money::new(dec!(10.015)).amount(), dec!(10.02));
        assert_eq!(Money::new(dec!(10.1)).amount(), dec!(10.10));
    }

    #[test]
    fn test_is_positive() {
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::new(dec!(-5)).is_positive());
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(dec!(60.00));
        let b = Money::new(dec!(40.00));
        assert_eq!(a.checked_add(b).unwrap().amount(), dec!(100.00));
        assert_eq!(a.checked_sub(b).unwrap().amount(), dec!(20.00));
    }

    #[test]
    fn test_remaining() {
        let needed = Money::new(dec!(100.00));
        assert_eq!(
            Money::remaining(needed, Money::new(dec!(60.00))).amount(),
            dec!(40.00)
        );
        assert_eq!(Money::remaining(needed, needed), Money::ZERO);
        // Over-received never yields a negative remainder.
        assert_eq!(
            Money::remaining(needed, Money::new(dec!(150.00))),
            Money::ZERO
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(5)).to_string(), "5.00");
        assert_eq!(Money::new(dec!(12.3)).to_string(), "12.30");
    }
}
