//! Price arithmetic for back-office actions
//!
//! Prices are `NUMERIC(10, 2)`. Every adjustment is computed in
//! `rust_decimal` and rounded back to two places (half away from zero), so
//! the stored value never depends on binary floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Multiplier applied by the "increase price by 10%" bulk action
pub const TEN_PERCENT_INCREASE: Decimal = dec!(1.10);

/// Largest price representable by a `NUMERIC(10, 2)` column
pub const MAX_PRICE: Decimal = dec!(99999999.99);

/// Rounds a money amount to cents
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Scales a price by `factor` and rounds to cents
pub fn scale_price(price: Decimal, factor: Decimal) -> Decimal {
    round_money(price * factor)
}

/// Applies the 10% increase used by the bulk action
pub fn increase_by_ten_percent(price: Decimal) -> Decimal {
    scale_price(price, TEN_PERCENT_INCREASE)
}

/// Checks that a price fits the column and is not negative
pub fn is_valid_price(price: Decimal) -> bool {
    price >= Decimal::ZERO && price <= MAX_PRICE && price.scale() <= 2
}
