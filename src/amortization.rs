use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::error::{LoanError, Result};
use crate::payment::fixed_payment;
use crate::rounding::round2;
use crate::schedule::{Schedule, generate};
use crate::summary::{SummaryResult, summarize};
use crate::types::{Money, Rate};

/// A validated request for one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    principal: Money,
    term_periods: u32,
    currency: String,
}

impl LoanRequest {
    /// Builds a request, rounding the principal to cents.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::InvalidInput`] when the principal is not positive
    /// or the currency is not a three-letter code, and
    /// [`LoanError::ZeroPeriods`] when the term is zero.
    pub fn new(principal: Money, term_periods: u32, currency: &str) -> Result<Self> {
        let principal = round2(principal);
        if principal <= Decimal::ZERO {
            return Err(LoanError::invalid_input("principal", "must be greater than zero"));
        }
        if term_periods == 0 {
            return Err(LoanError::ZeroPeriods);
        }
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(LoanError::invalid_input(
                "currency",
                format!("{currency:?} is not a three-letter code"),
            ));
        }

        Ok(LoanRequest {
            principal,
            term_periods,
            currency: currency.to_ascii_uppercase(),
        })
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn term_periods(&self) -> u32 {
        self.term_periods
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// A computed schedule together with its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amortization {
    /// Upper-case currency code of the request.
    pub currency: String,
    /// Number of payments.
    pub term_periods: u32,
    /// Periodic rate applied.
    pub rate: Rate,
    /// Totals and payment amounts.
    pub summary: SummaryResult,
    /// Period-by-period records.
    pub schedule: Schedule,
}

/// Computes the fixed-payment schedule and summary for `request`.
///
/// This is the main entry point of the library.
///
/// ```rust
/// use cuota_fija::{LoanConfig, LoanRequest, compute_schedule};
/// use rust_decimal_macros::dec;
///
/// let config = LoanConfig::reference();
/// let request = LoanRequest::new(dec!(12000), 12, "MXN").unwrap();
/// let result = compute_schedule(&request, &config.rates).unwrap();
///
/// assert_eq!(result.summary.periodic_payment, dec!(1761.16));
/// assert_eq!(result.schedule.len(), 13);
/// ```
///
/// # Errors
///
/// Returns [`LoanError::UnmappedTerm`] when the term has no configured rate.
pub fn compute_schedule(request: &LoanRequest, rates: &RateTable) -> Result<Amortization> {
    let rate = rates.rate_for(request.term_periods)?;
    let payment = round2(fixed_payment(request.principal, rate, request.term_periods)?);

    let schedule = generate(request.principal, rate, request.term_periods, payment)?;
    let summary = summarize(&schedule, payment);

    info!(
        "computed {} period schedule for {} {} at {}: payment {}, total interest {}",
        request.term_periods,
        request.principal,
        request.currency,
        rate,
        summary.periodic_payment,
        summary.total_interest
    );

    Ok(Amortization {
        currency: request.currency.clone(),
        term_periods: request.term_periods,
        rate,
        summary,
        schedule,
    })
}
