//! The interactive calculator: one active currency, at most one live result.
//!
//! The live result is always replaced wholesale. Recalculating, switching
//! currency and resetting all drop the previous schedule first, so amounts
//! computed for one currency never survive into another.

use std::io::Write;

use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::amortization::{Amortization, LoanRequest, compute_schedule};
use crate::config::{Bounds, CurrencyProfile, LoanConfig};
use crate::error::{LoanError, Result};
use crate::export::write_csv;
use crate::format::CurrencyFormatter;
use crate::parser::parse_amount_with_codes;
use crate::rounding::round2;
use crate::validator::check_bounds;

/// Calculator state for one user: active currency, its bounds and the live
/// result.
pub struct LoanSession<F: CurrencyFormatter> {
    config: LoanConfig,
    formatter: F,
    profile: CurrencyProfile,
    bounds: Bounds,
    result: Option<Amortization>,
}

impl<F: CurrencyFormatter> LoanSession<F> {
    /// Starts a session on the first configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: LoanConfig, formatter: F) -> Result<Self> {
        config.validate()?;
        let profile = config.currencies[0].clone();
        let bounds = config.limits.bounds_for(&profile.currency);
        Ok(LoanSession {
            config,
            formatter,
            profile,
            bounds,
            result: None,
        })
    }

    /// Configuration the session was started with.
    pub fn config(&self) -> &LoanConfig {
        &self.config
    }

    /// Active locale and currency.
    pub fn profile(&self) -> &CurrencyProfile {
        &self.profile
    }

    /// Amount bounds of the active currency.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The live result, if a calculation succeeded since the last reset.
    pub fn result(&self) -> Option<&Amortization> {
        self.result.as_ref()
    }

    /// Switches the active currency, resetting the bounds and clearing any
    /// computed schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::UnknownCurrency`] if no profile offers `currency`;
    /// the session is left unchanged in that case.
    pub fn select_currency(&mut self, currency: &str) -> Result<&CurrencyProfile> {
        let profile = self
            .config
            .profile(currency)
            .cloned()
            .ok_or_else(|| LoanError::UnknownCurrency(currency.to_string()))?;

        info!("switching currency to {} ({})", profile.currency, profile.locale);
        self.bounds = self.config.limits.bounds_for(&profile.currency);
        self.profile = profile;
        self.reset();
        Ok(&self.profile)
    }

    /// Drops the live result.
    pub fn reset(&mut self) {
        if self.result.take().is_some() {
            debug!("cleared computed schedule");
        }
    }

    /// Validates `raw`, computes the schedule for `term_periods` and makes it
    /// the live result.
    ///
    /// The previous result is cleared before validation, so a failed attempt
    /// leaves nothing on display.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::Amount`] for rejected input and
    /// [`LoanError::UnmappedTerm`] for a term without a rate.
    pub fn calculate(&mut self, raw: &str, term_periods: u32) -> Result<&Amortization> {
        self.reset();

        let value = self.validate(raw)?;
        let request = LoanRequest::new(round2(value), term_periods, &self.profile.currency)?;
        let result = compute_schedule(&request, &self.config.rates)?;

        Ok(self.result.insert(result))
    }

    /// Parses and range-checks `raw` against the active currency.
    pub fn validate(&self, raw: &str) -> Result<Decimal> {
        let codes = self.config.currency_codes();
        let value = parse_amount_with_codes(raw, &codes)?;
        Ok(check_bounds(value, self.bounds, &self.profile, &self.formatter)?)
    }

    /// The text the amount field should show once the user leaves it: the
    /// rounded, formatted amount.
    pub fn normalize_input(&self, raw: &str) -> Result<String> {
        let value = self.validate(raw)?;
        Ok(self.formatter.format_in(round2(value), &self.profile))
    }

    /// Example amount shown in an empty amount field.
    pub fn placeholder(&self) -> String {
        self.formatter.format_in(dec!(12000), &self.profile)
    }

    /// Heading for the schedule table, naming the active currency.
    pub fn caption(&self) -> String {
        format!("Amortization schedule ({})", self.profile.currency)
    }

    /// Periodic payment line of the live result, if any.
    pub fn payment_description(&self) -> Option<String> {
        self.result
            .as_ref()
            .map(|result| result.summary.describe_payment(&self.formatter, &self.profile))
    }

    /// Writes the live schedule as CSV. Returns `false` when there is nothing
    /// to export.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<bool> {
        match &self.result {
            Some(result) => {
                write_csv(&result.schedule, writer)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
