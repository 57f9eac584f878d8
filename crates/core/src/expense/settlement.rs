//! Payment confirmation against a single share.

use rust_decimal::Decimal;

use super::error::ExpenseError;
use super::types::{ExpenseStatus, ShareBalance};
use super::validation::validate_payment_amount;

/// Settlement tracker.
///
/// Applies payments to share balances and derives the expense status from
/// the paid flags of all its shares. Never mutates its inputs; a rejected
/// payment leaves the caller's state exactly as it was.
pub struct SettlementTracker;

impl SettlementTracker {
    /// Applies a payment to a share and returns the new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the payment is not positive whole cents
    /// - `AlreadyFullyPaid` if nothing is outstanding
    /// - `OverpaymentAttempt` if the payment exceeds the outstanding balance
    pub fn apply_payment(share: &ShareBalance, amount: Decimal) -> Result<ShareBalance, ExpenseError> {
        validate_payment_amount(amount)?;

        let outstanding = share.outstanding();
        if share.is_paid || outstanding <= Decimal::ZERO {
            return Err(ExpenseError::AlreadyFullyPaid);
        }
        if amount > outstanding {
            return Err(ExpenseError::OverpaymentAttempt { amount, outstanding });
        }

        let paid_amount = share.paid_amount + amount;
        Ok(ShareBalance {
            amount_owed: share.amount_owed,
            paid_amount,
            is_paid: paid_amount >= share.amount_owed,
        })
    }

    /// Derives the expense status after a payment from every share's paid flag.
    ///
    /// Only called once a payment has been recorded, so the result is never
    /// `Pending`.
    #[must_use]
    pub fn derive_status<I>(paid_flags: I) -> ExpenseStatus
    where
        I: IntoIterator<Item = bool>,
    {
        if paid_flags.into_iter().all(|paid| paid) {
            ExpenseStatus::FullySettled
        } else {
            ExpenseStatus::PartiallySettled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::types::ShareState;
    use rust_decimal_macros::dec;

    #[test]
    fn test_full_payment() {
        let share = ShareBalance::unpaid(dec!(20.00));
        let paid = SettlementTracker::apply_payment(&share, dec!(20.00)).unwrap();
        assert_eq!(paid.paid_amount, dec!(20.00));
        assert!(paid.is_paid);
        assert_eq!(paid.state(), ShareState::FullyPaid);
    }

    #[test]
    fn test_partial_payments_accumulate() {
        let share = ShareBalance::unpaid(dec!(40.00));
        let first = SettlementTracker::apply_payment(&share, dec!(15.00)).unwrap();
        assert_eq!(first.paid_amount, dec!(15.00));
        assert!(!first.is_paid);
        assert_eq!(first.state(), ShareState::PartiallyPaid);

        let second = SettlementTracker::apply_payment(&first, dec!(25.00)).unwrap();
        assert_eq!(second.paid_amount, dec!(40.00));
        assert!(second.is_paid);
    }

    #[test]
    fn test_overpayment_rejected() {
        let share = ShareBalance::unpaid(dec!(20.00));
        let err = SettlementTracker::apply_payment(&share, dec!(25.00)).unwrap_err();
        assert_eq!(
            err,
            ExpenseError::OverpaymentAttempt {
                amount: dec!(25.00),
                outstanding: dec!(20.00),
            }
        );
        assert_eq!(share.outstanding(), dec!(20.00));
    }

    #[test]
    fn test_paid_share_rejects_further_payment() {
        let share = ShareBalance {
            amount_owed: dec!(20.00),
            paid_amount: dec!(20.00),
            is_paid: true,
        };
        assert_eq!(
            SettlementTracker::apply_payment(&share, dec!(1)),
            Err(ExpenseError::AlreadyFullyPaid)
        );
    }

    #[test]
    fn test_nothing_outstanding_counts_as_paid() {
        // Flag out of sync with the amounts still refuses payment.
        let share = ShareBalance {
            amount_owed: dec!(20.00),
            paid_amount: dec!(20.00),
            is_paid: false,
        };
        assert_eq!(
            SettlementTracker::apply_payment(&share, dec!(0.01)),
            Err(ExpenseError::AlreadyFullyPaid)
        );
    }

    #[test]
    fn test_amount_validated_first() {
        let paid = ShareBalance {
            amount_owed: dec!(5),
            paid_amount: dec!(5),
            is_paid: true,
        };
        assert!(matches!(
            SettlementTracker::apply_payment(&paid, Decimal::ZERO),
            Err(ExpenseError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_derive_status() {
        assert_eq!(SettlementTracker::derive_status([true, true]), ExpenseStatus::FullySettled);
        assert_eq!(
            SettlementTracker::derive_status([true, false]),
            ExpenseStatus::PartiallySettled
        );
        assert_eq!(
            SettlementTracker::derive_status([false, true]),
            ExpenseStatus::PartiallySettled
        );
        assert_eq!(
            SettlementTracker::derive_status([false, false]),
            ExpenseStatus::PartiallySettled
        );
    }

    #[test]
    fn test_bob_and_cara_scenario() {
        let bob = ShareBalance::unpaid(dec!(20.00));
        let cara = ShareBalance::unpaid(dec!(40.00));

        assert!(SettlementTracker::apply_payment(&bob, dec!(25.00)).is_err());

        let bob = SettlementTracker::apply_payment(&bob, dec!(20.00)).unwrap();
        assert_eq!(
            SettlementTracker::derive_status([bob.is_paid, cara.is_paid]),
            ExpenseStatus::PartiallySettled
        );

        let cara = SettlementTracker::apply_payment(&cara, dec!(40.00)).unwrap();
        assert_eq!(
            SettlementTracker::derive_status([bob.is_paid, cara.is_paid]),
            ExpenseStatus::FullySettled
        );
    }
}
