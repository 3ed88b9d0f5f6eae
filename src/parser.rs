//! Normalization of free-form monetary input.
//!
//! Amounts arrive as typed by a person: `"$12,000.00"`, `"1.234,56 MXN"`,
//! `"12 000"`. Decorations are stripped first, then the separators are
//! disambiguated:
//!
//! - both `,` and `.` present: whichever appears last is the decimal separator
//!   and every occurrence of the other one is dropped;
//! - only `,` present: a single comma is the decimal separator, several commas
//!   framing groups of three digits are thousands separators;
//! - only `.` present: periods framing groups of three digits (`"1.234"`,
//!   `"1.234.567"`) are thousands separators unless the number leads with a
//!   zero (`"0.125"`); anything else is a decimal point.

use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;

use crate::error::AmountError;

/// Currency codes stripped from input when no configuration is at hand.
pub const DEFAULT_CURRENCY_CODES: [&str; 3] = ["MXN", "USD", "EUR"];

/// Parses a monetary string using the default currency codes.
///
/// ```rust
/// use cuota_fija::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount("1.234,56").unwrap(), dec!(1234.56));
/// assert_eq!(parse_amount("$1,234.56 MXN").unwrap(), dec!(1234.56));
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    parse_amount_with_codes(raw, &DEFAULT_CURRENCY_CODES)
}

/// Parses a monetary string, stripping any of `codes` (case-insensitive).
///
/// # Errors
///
/// Returns [`AmountError::Unparseable`] when nothing numeric is left after
/// normalization.
pub fn parse_amount_with_codes<S: AsRef<str>>(
    raw: &str,
    codes: &[S],
) -> Result<Decimal, AmountError> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !is_currency_symbol(*c))
        .collect();
    let stripped = remove_codes(&stripped, codes);

    let normalized = normalize_separators(&stripped).ok_or(AmountError::Unparseable)?;
    debug!("normalized amount {raw:?} to {normalized:?}");

    to_decimal(&normalized).ok_or(AmountError::Unparseable)
}

fn remove_codes<S: AsRef<str>>(input: &str, codes: &[S]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    'scan: while let Some(c) = rest.chars().next() {
        for code in codes.iter().map(|code| code.as_ref()).filter(|code| !code.is_empty()) {
            let matches = rest
                .get(..code.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(code));
            if matches {
                rest = &rest[code.len()..];
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn normalize_separators(s: &str) -> Option<String> {
    match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) => {
            let (decimal, grouping) = if comma > dot { (',', '.') } else { ('.', ',') };
            let ungrouped: String = s.chars().filter(|&c| c != grouping).collect();
            Some(ungrouped.replacen(decimal, ".", 1))
        }
        (Some(_), None) => {
            if s.matches(',').count() == 1 {
                Some(s.replacen(',', ".", 1))
            } else if is_grouped(s, ',') {
                Some(s.replace(',', ""))
            } else {
                None
            }
        }
        (None, Some(_)) if is_grouped(s, '.') => Some(s.replace('.', "")),
        _ => Some(s.to_string()),
    }
}

/// True when `separator` only ever splits the integer part into groups of three.
///
/// A grouped number never leads with a zero, so `"0.125"` is not grouped.
fn is_grouped(s: &str, separator: char) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let all_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());

    let mut groups = unsigned.split(separator);
    let leading = groups.next().unwrap_or_default();

    (1..=3).contains(&leading.len())
        && !leading.starts_with('0')
        && all_digits(leading)
        && groups.all(|group| group.len() == 3 && all_digits(group))
}

fn to_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() || s.contains('_') {
        return None;
    }

    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Characters of the Unicode "Currency Symbol" (Sc) general category.
fn is_currency_symbol(c: char) -> bool {
    matches!(
        c,
        '\u{0024}'
            | '\u{00A2}'..='\u{00A5}'
            | '\u{058F}'
            | '\u{060B}'
            | '\u{07FE}'..='\u{07FF}'
            | '\u{09F2}'..='\u{09F3}'
            | '\u{09FB}'
            | '\u{0AF1}'
            | '\u{0BF9}'
            | '\u{0E3F}'
            | '\u{17DB}'
            | '\u{20A0}'..='\u{20C0}'
            | '\u{A838}'
            | '\u{FDFC}'
            | '\u{FE69}'
            | '\u{FF04}'
            | '\u{FFE0}'..='\u{FFE1}'
            | '\u{FFE5}'..='\u{FFE6}'
            | '\u{11FDD}'..='\u{11FE0}'
            | '\u{1E2FF}'
            | '\u{1ECB0}'
    )
}
