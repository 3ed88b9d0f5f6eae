use rust_decimal::Decimal;

use crate::config::{Bounds, CurrencyLimits, CurrencyProfile};
use crate::error::AmountError;
use crate::format::CurrencyFormatter;
use crate::parser::parse_amount_with_codes;

/// Parses `raw` and checks it against `bounds`.
///
/// Checks run in order and only the first failure is reported: the amount must
/// parse, be greater than zero, be at least `bounds.min` and at most
/// `bounds.max`. Bound messages embed the limit formatted for `profile`.
///
/// # Errors
///
/// Returns the [`AmountError`] of the first failing check.
pub fn validate_amount(
    raw: &str,
    bounds: Bounds,
    profile: &CurrencyProfile,
    formatter: &dyn CurrencyFormatter,
) -> Result<Decimal, AmountError> {
    let codes = [profile.currency.as_str(), "MXN", "USD", "EUR"];
    let value = parse_amount_with_codes(raw, &codes)?;
    check_bounds(value, bounds, profile, formatter)
}

/// Like [`validate_amount`], resolving the bounds from `limits` by the
/// profile's currency (falling back to the default bounds).
pub fn validate_amount_for(
    raw: &str,
    limits: &CurrencyLimits,
    profile: &CurrencyProfile,
    formatter: &dyn CurrencyFormatter,
) -> Result<Decimal, AmountError> {
    validate_amount(raw, limits.bounds_for(&profile.currency), profile, formatter)
}

/// Range checks for an already parsed amount.
pub fn check_bounds(
    value: Decimal,
    bounds: Bounds,
    profile: &CurrencyProfile,
    formatter: &dyn CurrencyFormatter,
) -> Result<Decimal, AmountError> {
    if value <= Decimal::ZERO {
        return Err(AmountError::NonPositive);
    }
    if value < bounds.min {
        return Err(AmountError::BelowMinimum {
            minimum: formatter.format_in(bounds.min, profile),
        });
    }
    if value > bounds.max {
        return Err(AmountError::AboveMaximum {
            maximum: formatter.format_in(bounds.max, profile),
        });
    }
    Ok(value)
}
