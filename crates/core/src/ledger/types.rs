//! Ledger domain types.

use kindra_shared::types::Money;

/// The validated outcome of applying a donation to a request.
///
/// A plan is only produced for donations that fit entirely within the
/// remaining capacity; there is no partial acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationPlan {
    /// The donated amount.
    pub amount: Money,
    /// The request's running total after applying the donation.
    pub new_amount_received: Money,
    /// True if this donation reaches the funding target, closing the
    /// request (status flips to Completed in the same atomic step).
    pub completes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_fields() {
        let plan = DonationPlan {
            amount: Money::new(dec!(40.00)),
            new_amount_received: Money::new(dec!(100.00)),
            completes: true,
        };
        assert!(plan.completes);
        assert_eq!(plan.new_amount_received.amount(), dec!(100.00));
    }
}
