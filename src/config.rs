//! Static configuration: periodic rates by term, amount bounds by currency and
//! the locale/currency pairs offered for formatting.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};
use crate::types::Rate;

/// Bounds used for any currency missing from [`CurrencyLimits`].
pub const DEFAULT_BOUNDS: Bounds = Bounds {
    min: dec!(1),
    max: dec!(1000000),
};

/// Periodic interest rate for each offered term length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<u32, Rate>);

impl RateTable {
    /// Builds a table from `(term, rate)` pairs.
    pub fn new(rates: impl IntoIterator<Item = (u32, Rate)>) -> Self {
        RateTable(rates.into_iter().collect())
    }

    /// Looks up the periodic rate for a term.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::UnmappedTerm`] when the term has no rate. Only
    /// mapped terms are ever offered, so this indicates a caller bug.
    pub fn rate_for(&self, term_periods: u32) -> Result<Rate> {
        self.0
            .get(&term_periods)
            .copied()
            .ok_or(LoanError::UnmappedTerm(term_periods))
    }

    /// Offered terms in ascending order.
    pub fn terms(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// `(term, rate)` pairs in ascending term order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Rate)> + '_ {
        self.0.iter().map(|(term, rate)| (*term, *rate))
    }

    /// True when no term is offered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inclusive amount bounds for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest accepted amount.
    pub min: Decimal,
    /// Largest accepted amount.
    pub max: Decimal,
}

/// Amount bounds keyed by upper-case currency code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyLimits(BTreeMap<String, Bounds>);

impl CurrencyLimits {
    /// Builds the limits, upper-casing every currency code.
    pub fn new<S: Into<String>>(limits: impl IntoIterator<Item = (S, Bounds)>) -> Self {
        CurrencyLimits(
            limits
                .into_iter()
                .map(|(code, bounds)| (code.into().to_ascii_uppercase(), bounds))
                .collect(),
        )
    }

    /// Bounds listed for `currency`, matched case-insensitively.
    pub fn get(&self, currency: &str) -> Option<Bounds> {
        self.0.get(&currency.to_ascii_uppercase()).copied()
    }

    /// Bounds for `currency`, or [`DEFAULT_BOUNDS`] when it is not listed.
    pub fn bounds_for(&self, currency: &str) -> Bounds {
        self.get(currency).unwrap_or_else(|| {
            warn!("no amount limits for currency {currency}, using defaults");
            DEFAULT_BOUNDS
        })
    }

    /// True when `currency` has its own bounds.
    pub fn contains(&self, currency: &str) -> bool {
        self.get(currency).is_some()
    }

    /// Listed currency codes in alphabetical order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A locale and the currency formatted in it, e.g. `es-MX` / `MXN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyProfile {
    /// BCP 47 locale tag used for formatting.
    pub locale: String,
    /// Upper-case ISO 4217 code.
    pub currency: String,
}

impl CurrencyProfile {
    /// Builds a profile, upper-casing the currency code.
    pub fn new(locale: &str, currency: &str) -> Self {
        CurrencyProfile {
            locale: locale.to_string(),
            currency: currency.to_ascii_uppercase(),
        }
    }
}

/// Everything the calculator needs to know about a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    /// Periodic rate per offered term.
    pub rates: RateTable,
    /// Amount bounds per currency.
    pub limits: CurrencyLimits,
    /// Offered currencies; the first one is active when a session starts.
    pub currencies: Vec<CurrencyProfile>,
}

impl LoanConfig {
    /// The reference deployment: 6, 12 and 18 monthly periods with MXN, USD
    /// and EUR.
    pub fn reference() -> Self {
        LoanConfig {
            rates: RateTable::new([(6, dec!(0.05)), (12, dec!(0.10)), (18, dec!(0.15))]),
            limits: CurrencyLimits::new([
                ("MXN", Bounds { min: dec!(1000), max: dec!(1000000) }),
                ("USD", Bounds { min: dec!(60), max: dec!(60000) }),
                ("EUR", Bounds { min: dec!(55), max: dec!(55000) }),
            ]),
            currencies: vec![
                CurrencyProfile::new("es-MX", "MXN"),
                CurrencyProfile::new("en-US", "USD"),
                CurrencyProfile::new("es-ES", "EUR"),
            ],
        }
    }

    /// Parses and validates a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: LoanConfig = serde_yaml::from_str(yaml)?;
        config.limits = CurrencyLimits::new(config.limits.0);
        for profile in &mut config.currencies {
            profile.currency.make_ascii_uppercase();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(
            "loaded loan configuration from {} ({} terms, {} currencies)",
            path.display(),
            config.rates.terms().count(),
            config.currencies.len()
        );
        Ok(config)
    }

    /// Checks the invariants the calculator relies on.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.rates.is_empty() {
            return Err(LoanError::InvalidConfig("rate table is empty".into()));
        }
        for (term, rate) in self.rates.iter() {
            if term == 0 {
                return Err(LoanError::InvalidConfig("term of 0 periods".into()));
            }
            if rate.is_sign_negative() {
                return Err(LoanError::InvalidConfig(format!(
                    "negative rate {rate} for term {term}"
                )));
            }
        }

        for (code, bounds) in &self.limits.0 {
            if bounds.min <= Decimal::ZERO || bounds.min >= bounds.max {
                return Err(LoanError::InvalidConfig(format!(
                    "bounds for {code} must satisfy 0 < min < max (got {}..{})",
                    bounds.min, bounds.max
                )));
            }
        }

        if self.currencies.is_empty() {
            return Err(LoanError::InvalidConfig("no currencies offered".into()));
        }
        for (index, profile) in self.currencies.iter().enumerate() {
            if !self.limits.contains(&profile.currency) {
                return Err(LoanError::InvalidConfig(format!(
                    "currency {} ({}) has no amount limits",
                    profile.currency, profile.locale
                )));
            }
            if self.currencies[..index]
                .iter()
                .any(|other| other.currency == profile.currency)
            {
                return Err(LoanError::InvalidConfig(format!(
                    "currency {} is offered twice",
                    profile.currency
                )));
            }
        }

        Ok(())
    }

    /// Profile for a currency code, case-insensitive.
    pub fn profile(&self, currency: &str) -> Option<&CurrencyProfile> {
        self.currencies
            .iter()
            .find(|profile| profile.currency.eq_ignore_ascii_case(currency))
    }

    /// Every currency code the parser should strip from input.
    pub fn currency_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.limits.codes().collect();
        for profile in &self.currencies {
            if !codes.contains(&profile.currency.as_str()) {
                codes.push(&profile.currency);
            }
        }
        codes
    }
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_reference_config_is_valid() {
        let config = LoanConfig::reference();
        assert!(config.validate().is_ok());
        assert_eq!(config.rates.terms().collect::<Vec<_>>(), vec![6, 12, 18]);
    }

    #[rstest]
    #[case(6, dec!(0.05))]
    #[case(12, dec!(0.10))]
    #[case(18, dec!(0.15))]
    fn test_rate_for_mapped_terms(#[case] term: u32, #[case] expected: Rate) {
        assert_eq!(LoanConfig::reference().rates.rate_for(term).unwrap(), expected);
    }

    #[test]
    fn test_rate_for_unmapped_term() {
        let result = LoanConfig::reference().rates.rate_for(24);
        assert!(matches!(result, Err(LoanError::UnmappedTerm(24))));
    }

    #[test]
    fn test_bounds_lookup_and_fallback() {
        let limits = LoanConfig::reference().limits;
        assert_eq!(limits.bounds_for("mxn"), Bounds { min: dec!(1000), max: dec!(1000000) });
        assert_eq!(limits.bounds_for("USD").max, dec!(60000));
        assert_eq!(limits.bounds_for("GBP"), DEFAULT_BOUNDS);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
rates:
  6: 0.05
  12: 0.10
limits:
  MXN: { min: 1000, max: 1000000 }
  GBP: { min: 50, max: 50000 }
currencies:
  - { locale: es-MX, currency: MXN }
  - { locale: en-GB, currency: gbp }
"#;
        let config = LoanConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.rates.rate_for(12).unwrap(), dec!(0.10));
        assert_eq!(config.limits.bounds_for("GBP").min, dec!(50));
        assert_eq!(config.profile("GBP").unwrap().locale, "en-GB");
        assert_eq!(config.currency_codes(), vec!["GBP", "MXN"]);
    }

    #[rstest]
    #[case("rates: {}\nlimits: {MXN: {min: 1, max: 2}}\ncurrencies: [{locale: es-MX, currency: MXN}]")]
    #[case("rates: {0: 0.05}\nlimits: {MXN: {min: 1, max: 2}}\ncurrencies: [{locale: es-MX, currency: MXN}]")]
    #[case("rates: {6: -0.05}\nlimits: {MXN: {min: 1, max: 2}}\ncurrencies: [{locale: es-MX, currency: MXN}]")]
    #[case("rates: {6: 0.05}\nlimits: {MXN: {min: 5, max: 2}}\ncurrencies: [{locale: es-MX, currency: MXN}]")]
    #[case("rates: {6: 0.05}\nlimits: {MXN: {min: 0, max: 2}}\ncurrencies: [{locale: es-MX, currency: MXN}]")]
    #[case("rates: {6: 0.05}\nlimits: {MXN: {min: 1, max: 2}}\ncurrencies: []")]
    #[case("rates: {6: 0.05}\nlimits: {MXN: {min: 1, max: 2}}\ncurrencies: [{locale: en-US, currency: USD}]")]
    #[case("rates: {6: 0.05}\nlimits: {MXN: {min: 1, max: 2}}\ncurrencies: [{locale: es-MX, currency: MXN}, {locale: en-US, currency: mxn}]")]
    fn test_invalid_configs_are_rejected(#[case] yaml: &str) {
        let result = LoanConfig::from_yaml_str(yaml);
        assert!(matches!(result, Err(LoanError::InvalidConfig(_))), "{result:?}");
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(LoanConfig::from_yaml_str("rates: ["), Err(LoanError::Yaml(_))));
    }
}
