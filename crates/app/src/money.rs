//! Dinar amounts

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};

/// Render a dinar amount for display, rounded to the centime.
pub fn format_dzd(amount: Decimal) -> String {
    let minor = (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64();

    match minor {
        Some(minor) => Money::from_minor(minor, iso::DZD).to_string(),
        None => format!("{amount} DZD"),
    }
}
