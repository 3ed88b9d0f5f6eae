use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{LoanError, Result};
use crate::types::{Money, Rate};

/// Calculates the fixed periodic payment that retires `principal` over
/// `periods` payments at `rate` per period.
///
/// The annuity formula is: PMT = P * [i(1 + i)^n] / [(1 + i)^n - 1]
///
/// With a zero rate the payment is simply `principal / periods`. The result is
/// not rounded; callers round it once to obtain the canonical payment.
///
/// # Arguments
///
/// * `principal` - The amount borrowed.
/// * `rate` - The periodic interest rate as a fraction (not percentage).
/// * `periods` - The number of payments.
///
/// # Errors
///
/// Returns [`LoanError::ZeroPeriods`] if `periods` is zero and
/// [`LoanError::InvalidInput`] for a negative rate or a payment too large to
/// represent.
pub fn fixed_payment(principal: Money, rate: Rate, periods: u32) -> Result<Money> {
    if periods == 0 {
        return Err(LoanError::ZeroPeriods);
    }
    if rate.is_sign_negative() {
        return Err(LoanError::invalid_input("rate", format!("{rate} is negative")));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let overflow = || {
        LoanError::invalid_input("rate", format!("{rate} over {periods} periods overflows"))
    };

    let growth = dec!(1)
        .checked_add(rate)
        .and_then(|base| base.checked_powu(periods.into()))
        .ok_or_else(overflow)?;

    rate.checked_mul(growth)
        .and_then(|factor| principal.checked_mul(factor))
        .and_then(|scaled| scaled.checked_div(growth - dec!(1)))
        .ok_or_else(overflow)
}
