//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{
    MAX_AMOUNT, MONEY_SCALE, format_money, is_whole_cents, is_within_limit, round_money,
};
