//! Shared household expenses.
//!
//! This module implements:
//! - Splitting an expense evenly or manually into per-member shares
//! - Confirming payments against a share
//! - Deriving the expense settlement status from its shares
//! - Error types for expense operations

pub mod error;
pub mod settlement;
pub mod split;
pub mod types;
pub mod validation;

#[cfg(test)]
mod settlement_props;
#[cfg(test)]
mod split_props;

pub use error::ExpenseError;
pub use settlement::SettlementTracker;
pub use split::Splitter;
pub use types::{
    CreateExpenseInput, ExpenseStatus, HouseholdMembership, ManualShare, PlannedShare,
    ShareBalance, ShareState, SplitPlan, VoteStatus,
};
pub use validation::{require_membership, require_visible_expense, validate_payment_amount};
