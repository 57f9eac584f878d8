//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod expense;
pub mod household;

pub use expense::{ExpenseRepository, ExpenseWithShares, PaymentReceipt};
pub use household::{HouseholdError, HouseholdRepository, MemberInfo};
