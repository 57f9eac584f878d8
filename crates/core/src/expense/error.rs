//! Expense error types for splitting and settlement.
//!
//! Every rejected operation maps to exactly one variant. Variants carry the
//! offending values (participant, amounts) so the caller can tell what to fix.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{ExpenseId, UserId};
use thiserror::Error;

/// Errors that can occur while creating, splitting or settling an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    // ========== Household Errors ==========
    /// The caller has no active household membership.
    #[error("User is not currently in any household")]
    NotInHousehold,

    /// An even split excluding the creator has nobody to split with.
    #[error("No other active members in the household to split with")]
    NoOtherMembers,

    // ========== Validation Errors ==========
    /// Amount is zero, negative, finer than a cent, or too small to split.
    #[error("{0}")]
    InvalidAmount(String),

    /// Description is empty or whitespace.
    #[error("Cannot create expense: Description cannot be empty")]
    InvalidDescription,

    /// Manual split requested without any shares.
    #[error("Manual shares list cannot be empty when split_evenly is false")]
    EmptyManualShares,

    /// Manual share names someone outside the household.
    #[error("User {0} is not an active member of this household")]
    InvalidParticipant(UserId),

    /// Manual share names the same participant twice.
    #[error("User {0} appears more than once in the manual shares")]
    DuplicateParticipant(UserId),

    /// Manual shares do not add up to the expense total.
    #[error(
        "Cannot create expense: Split amounts {split_total:.2} do not equal expense total {expense_total:.2}"
    )]
    ShareMismatch {
        /// Sum of the manual shares.
        split_total: Decimal,
        /// The expense total.
        expense_total: Decimal,
    },

    // ========== Settlement Errors ==========
    /// Expense does not exist or belongs to another household.
    #[error("Expense not found")]
    ExpenseNotFound(ExpenseId),

    /// The caller owes nothing on this expense.
    #[error("Cannot confirm payment: You do not have an expense share for this expense")]
    NoShareForUser,

    /// The caller's share has nothing outstanding.
    #[error("Cannot confirm payment: Your expense share is already fully paid")]
    AlreadyFullyPaid,

    /// Payment is larger than what is still owed.
    #[error(
        "Cannot confirm payment: Amount {amount:.2} exceeds outstanding balance of {outstanding:.2}"
    )]
    OverpaymentAttempt {
        /// Requested payment.
        amount: Decimal,
        /// Balance still owed before the payment.
        outstanding: Decimal,
    },

    // ========== Persistence Errors ==========
    /// Store failure. The whole operation was rolled back.
    #[error("Database error during {0}")]
    PersistenceFailure(String),
}

impl ExpenseError {
    /// Returns the stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotInHousehold => "NOT_IN_HOUSEHOLD",
            Self::NoOtherMembers => "NO_OTHER_MEMBERS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidDescription => "INVALID_DESCRIPTION",
            Self::EmptyManualShares => "EMPTY_MANUAL_SHARES",
            Self::InvalidParticipant(_) => "INVALID_PARTICIPANT",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::ShareMismatch { .. } => "SHARE_MISMATCH",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::NoShareForUser => "NO_SHARE_FOR_USER",
            Self::AlreadyFullyPaid => "ALREADY_FULLY_PAID",
            Self::OverpaymentAttempt { .. } => "OVERPAYMENT_ATTEMPT",
            Self::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// Returns true if the error was raised before any mutation was attempted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::PersistenceFailure(_))
    }
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::ExpenseNotFound(_) => Self::NotFound(err.to_string()),
            ExpenseError::PersistenceFailure(_) => Self::Database(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
