//! Decimal rounding rules shared by the allowance arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

use daybudget_domain::CurrencyCode;

/// Rounds down to the currency's smallest unit. Used for every allowance split.
pub fn floor_to_unit(value: Decimal, currency: &CurrencyCode) -> Decimal {
    value.round_dp_with_strategy(currency.minor_units(), RoundingStrategy::ToNegativeInfinity)
}

/// Rounds half-to-even to the currency's smallest unit. Used for displayed aggregates.
pub fn round_for_display(value: Decimal, currency: &CurrencyCode) -> Decimal {
    value.round_dp_with_strategy(currency.minor_units(), RoundingStrategy::MidpointNearestEven)
}

/// Splits `amount` over `days`, flooring the share. Non-positive day counts are treated as one day.
pub fn split_per_day(amount: Decimal, days: i64, currency: &CurrencyCode) -> Decimal {
    let days = Decimal::from(days.max(1));
    floor_to_unit(amount / days, currency)
}
