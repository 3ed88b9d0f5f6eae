/// Monetary amounts. Always `Decimal`, never `f64`.
pub type Money = rust_decimal::Decimal;

/// Periodic rates as fractions (0.05 = 5% per period), never percentages.
pub type Rate = rust_decimal::Decimal;
