//! Validation and lookup helpers shared by the splitter and the settlement tracker.

use rust_decimal::Decimal;
use tally_shared::types::{
    ExpenseId, HouseholdId, MAX_AMOUNT, format_money, is_whole_cents, is_within_limit,
};

use super::error::ExpenseError;
use super::types::HouseholdMembership;

/// Requires an active household membership.
///
/// # Errors
///
/// Returns `ExpenseError::NotInHousehold` if the caller has none.
pub fn require_membership(
    membership: Option<HouseholdMembership>,
) -> Result<HouseholdMembership, ExpenseError> {
    membership.ok_or(ExpenseError::NotInHousehold)
}

/// Requires that an expense exists and belongs to the caller's household.
///
/// A foreign expense is reported exactly like a missing one.
///
/// # Errors
///
/// Returns `ExpenseError::ExpenseNotFound` otherwise.
pub fn require_visible_expense(
    expense_id: ExpenseId,
    expense_household: Option<HouseholdId>,
    caller_household: HouseholdId,
) -> Result<(), ExpenseError> {
    match expense_household {
        Some(household) if household == caller_household => Ok(()),
        _ => Err(ExpenseError::ExpenseNotFound(expense_id)),
    }
}

/// Validates an expense total.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidAmount` if the total is not positive, not
/// whole cents, or above [`MAX_AMOUNT`].
pub fn validate_expense_amount(amount: Decimal) -> Result<(), ExpenseError> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::InvalidAmount(
            "Cannot create expense: Amount must be greater than zero".to_string(),
        ));
    }
    validate_whole_cents(amount)?;
    validate_within_limit(amount)
}

/// Validates a payment amount.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidAmount` if the payment is not positive, not
/// whole cents, or above [`MAX_AMOUNT`].
pub fn validate_payment_amount(amount: Decimal) -> Result<(), ExpenseError> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::InvalidAmount(
            "Payment amount must be greater than zero".to_string(),
        ));
    }
    validate_whole_cents(amount)?;
    validate_within_limit(amount)
}

/// Validates an expense description.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidDescription` if it is blank.
pub fn validate_description(description: &str) -> Result<(), ExpenseError> {
    if description.trim().is_empty() {
        return Err(ExpenseError::InvalidDescription);
    }
    Ok(())
}

/// Rejects amounts with a fraction of a cent.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidAmount` naming the amount.
pub fn validate_whole_cents(amount: Decimal) -> Result<(), ExpenseError> {
    if is_whole_cents(amount) {
        Ok(())
    } else {
        Err(ExpenseError::InvalidAmount(format!(
            "Amount {amount} has more than two decimal places"
        )))
    }
}

/// Rejects amounts too large to store.
///
/// # Errors
///
/// Returns `ExpenseError::InvalidAmount` if the amount exceeds [`MAX_AMOUNT`].
pub fn validate_within_limit(amount: Decimal) -> Result<(), ExpenseError> {
    if is_within_limit(amount) {
        Ok(())
    } else {
        Err(ExpenseError::InvalidAmount(format!(
            "Amount {amount} exceeds the maximum of {MAX_AMOUNT}"
        )))
    }
}

/// Builds the error for a split that would leave someone owing nothing.
pub(crate) fn too_small_to_split(total: Decimal, participants: usize) -> ExpenseError {
    ExpenseError::InvalidAmount(format!(
        "Cannot split {} among {participants} participants: every share must be greater than zero",
        format_money(total)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::UserId;

    #[test]
    fn test_require_membership() {
        assert_eq!(require_membership(None), Err(ExpenseError::NotInHousehold));

        let membership = HouseholdMembership {
            household_id: HouseholdId::new(),
            user_id: UserId::new(),
        };
        assert_eq!(require_membership(Some(membership)), Ok(membership));
    }

    #[test]
    fn test_foreign_expense_looks_missing() {
        let expense_id = ExpenseId::new();
        let mine = HouseholdId::new();
        let theirs = HouseholdId::new();

        assert!(require_visible_expense(expense_id, Some(mine), mine).is_ok());
        assert_eq!(
            require_visible_expense(expense_id, Some(theirs), mine),
            Err(ExpenseError::ExpenseNotFound(expense_id))
        );
        assert_eq!(
            require_visible_expense(expense_id, None, mine),
            Err(ExpenseError::ExpenseNotFound(expense_id))
        );
    }

    #[test]
    fn test_expense_amount() {
        assert!(validate_expense_amount(dec!(0.01)).is_ok());
        assert!(validate_expense_amount(dec!(100.10)).is_ok());
        assert!(matches!(
            validate_expense_amount(Decimal::ZERO),
            Err(ExpenseError::InvalidAmount(msg)) if msg.contains("greater than zero")
        ));
        assert!(validate_expense_amount(dec!(-5)).is_err());
        assert!(matches!(
            validate_expense_amount(dec!(10.005)),
            Err(ExpenseError::InvalidAmount(msg)) if msg.contains("two decimal places")
        ));
    }

    #[test]
    fn test_payment_amount() {
        assert!(validate_payment_amount(dec!(5)).is_ok());
        assert_eq!(
            validate_payment_amount(dec!(0)),
            Err(ExpenseError::InvalidAmount(
                "Payment amount must be greater than zero".to_string()
            ))
        );
        assert!(validate_payment_amount(dec!(-0.01)).is_err());
        assert!(validate_payment_amount(dec!(0.001)).is_err());
    }

    #[test]
    fn test_amount_limit() {
        assert!(validate_expense_amount(dec!(9999999999.99)).is_ok());
        assert!(validate_payment_amount(dec!(9999999999.99)).is_ok());
        assert!(matches!(
            validate_expense_amount(dec!(10000000000.00)),
            Err(ExpenseError::InvalidAmount(msg)) if msg.contains("exceeds the maximum of 9999999999.99")
        ));
        assert!(matches!(
            validate_payment_amount(dec!(10000000000)),
            Err(ExpenseError::InvalidAmount(_))
        ));
        assert!(validate_within_limit(Decimal::MAX).is_err());
    }

    #[test]
    fn test_description() {
        assert!(validate_description("Groceries").is_ok());
        assert_eq!(validate_description(""), Err(ExpenseError::InvalidDescription));
        assert_eq!(validate_description("   "), Err(ExpenseError::InvalidDescription));
    }
}
