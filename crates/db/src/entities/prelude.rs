//! Entity aliases.

pub use super::expense_shares::Entity as ExpenseShares;
pub use super::expenses::Entity as Expenses;
pub use super::household_members::Entity as HouseholdMembers;
pub use super::households::Entity as Households;
pub use super::users::Entity as Users;
