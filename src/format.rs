use rust_decimal::Decimal;

use crate::config::CurrencyProfile;
use crate::rounding::round2;

/// Renders money for people. Arithmetic never depends on its output.
pub trait CurrencyFormatter {
    fn format(&self, value: Decimal, locale: &str, currency: &str) -> String;

    fn format_in(&self, value: Decimal, profile: &CurrencyProfile) -> String {
        self.format(value, &profile.locale, &profile.currency)
    }
}

/// Formatter with the separator and symbol conventions of the common
/// Spanish, English and continental European locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleFormatter;

struct Conventions {
    grouping: &'static str,
    /// Fewest integer digits that get grouped at all.
    min_grouped: usize,
    decimal: char,
    symbol_first: bool,
}

impl Conventions {
    fn for_locale(locale: &str) -> Self {
        let mut parts = locale.split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts.next().unwrap_or_default().to_ascii_uppercase();

        match (language.as_str(), region.as_str()) {
            ("es", "MX" | "US") => Self::point(),
            ("fr", _) => Conventions {
                grouping: "\u{202F}",
                min_grouped: 4,
                decimal: ',',
                symbol_first: false,
            },
            // Spanish leaves four-digit amounts ungrouped ("1000,00 €").
            ("es", _) => Conventions {
                grouping: ".",
                min_grouped: 5,
                decimal: ',',
                symbol_first: false,
            },
            ("de" | "it" | "pt" | "nl", _) => Conventions {
                grouping: ".",
                min_grouped: 4,
                decimal: ',',
                symbol_first: false,
            },
            _ => Self::point(),
        }
    }

    fn point() -> Self {
        Conventions {
            grouping: ",",
            min_grouped: 4,
            decimal: '.',
            symbol_first: true,
        }
    }
}

fn symbol(locale: &str, currency: &str) -> String {
    let home = |region: &str| locale.to_ascii_uppercase().ends_with(region);
    match currency {
        "MXN" if home("MX") => "$".to_string(),
        "USD" if home("US") => "$".to_string(),
        "MXN" => "MX$".to_string(),
        "USD" => "US$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => other.to_string(),
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    out
}

impl CurrencyFormatter for LocaleFormatter {
    fn format(&self, value: Decimal, locale: &str, currency: &str) -> String {
        let conventions = Conventions::for_locale(locale);
        let currency = currency.to_ascii_uppercase();
        let symbol = symbol(locale, &currency);

        let rounded = round2(value);
        let fixed = rounded.abs().to_string();
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let integer = if integer.len() >= conventions.min_grouped {
            group_thousands(integer, conventions.grouping)
        } else {
            integer.to_string()
        };
        let number = format!("{integer}{}{fraction}", conventions.decimal);

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        if conventions.symbol_first {
            format!("{sign}{symbol}{number}")
        } else {
            format!("{sign}{number}\u{A0}{symbol}")
        }
    }
}

/// Plain two-digit representation without symbol or grouping, as used in
/// CSV exports.
pub fn format_fixed(value: Decimal) -> String {
    round2(value).to_string()
}
