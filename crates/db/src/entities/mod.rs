//! `SeaORM` entity definitions.

pub mod prelude;

pub mod expense_shares;
pub mod expenses;
pub mod household_members;
pub mod households;
pub mod sea_orm_active_enums;
pub mod users;
