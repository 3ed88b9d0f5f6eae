use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to exactly two fraction digits, half away from zero.
///
/// Every amount the calculator, schedule generator and summary produce goes
/// through here before it is stored, so cents never drift between periods.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1.005), dec!(1.01))]
    #[case(dec!(1.004999), dec!(1.00))]
    #[case(dec!(2.675), dec!(2.68))]
    #[case(dec!(1761.159781203447609765684419), dec!(1761.16))]
    #[case(dec!(0), dec!(0.00))]
    #[case(dec!(-1.005), dec!(-1.01))]
    fn test_round2(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round2(input), expected);
    }

    #[test]
    fn test_round2_always_carries_two_digits() {
        assert_eq!(round2(dec!(12000)).to_string(), "12000.00");
        assert_eq!(round2(dec!(0.1)).to_string(), "0.10");
    }
}
