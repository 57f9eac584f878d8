//! Money helpers for two-decimal currency amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` with cents as the smallest unit.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places in a currency amount (cents).
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12,2)` column holds: 9,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

/// Rounds an amount to whole cents using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount has no fraction of a cent.
///
/// Trailing zeros do not count: `10.500` is whole cents, `10.005` is not.
#[must_use]
pub fn is_whole_cents(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Returns true if the amount fits in a stored money column.
#[must_use]
pub fn is_within_limit(amount: Decimal) -> bool {
    amount <= MAX_AMOUNT
}

/// Formats an amount with exactly two decimals, e.g. `20` as `"20.00"`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}
