//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `expense_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_status")]
pub enum ExpenseStatus {
    /// No payment recorded yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Some shares paid.
    #[sea_orm(string_value = "partially_settled")]
    PartiallySettled,
    /// All shares paid.
    #[sea_orm(string_value = "fully_settled")]
    FullySettled,
}

/// `vote_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "vote_status")]
pub enum VoteStatus {
    /// Awaiting the participant.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<tally_core::expense::ExpenseStatus> for ExpenseStatus {
    fn from(status: tally_core::expense::ExpenseStatus) -> Self {
        use tally_core::expense::ExpenseStatus as Domain;
        match status {
            Domain::Pending => Self::Pending,
            Domain::PartiallySettled => Self::PartiallySettled,
            Domain::FullySettled => Self::FullySettled,
        }
    }
}

impl From<ExpenseStatus> for tally_core::expense::ExpenseStatus {
    fn from(status: ExpenseStatus) -> Self {
        match status {
            ExpenseStatus::Pending => Self::Pending,
            ExpenseStatus::PartiallySettled => Self::PartiallySettled,
            ExpenseStatus::FullySettled => Self::FullySettled,
        }
    }
}

impl From<tally_core::expense::VoteStatus> for VoteStatus {
    fn from(status: tally_core::expense::VoteStatus) -> Self {
        use tally_core::expense::VoteStatus as Domain;
        match status {
            Domain::Pending => Self::Pending,
            Domain::Accepted => Self::Accepted,
            Domain::Rejected => Self::Rejected,
        }
    }
}

impl From<VoteStatus> for tally_core::expense::VoteStatus {
    fn from(status: VoteStatus) -> Self {
        match status {
            VoteStatus::Pending => Self::Pending,
            VoteStatus::Accepted => Self::Accepted,
            VoteStatus::Rejected => Self::Rejected,
        }
    }
}
