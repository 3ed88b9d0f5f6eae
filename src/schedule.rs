use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};
use crate::rounding::round2;
use crate::types::{Money, Rate};

/// One row of an amortization schedule.
///
/// Period 0 is the state before any payment: both balances equal the
/// principal and every other amount is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Period number, 0 for the initial state.
    pub period: u32,
    /// Balance owed when the period starts.
    pub opening_balance: Money,
    /// Amount paid this period.
    pub payment: Money,
    /// Portion of the payment that covers interest.
    pub interest: Money,
    /// Portion of the payment that reduces the balance.
    pub principal: Money,
    /// Balance owed after the payment.
    pub closing_balance: Money,
}

/// Chronologically ordered schedule, period 0 included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    records: Vec<PeriodRecord>,
}

impl Schedule {
    /// All records, period 0 first.
    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    /// Records that carry a payment (period 1 onwards).
    pub fn installments(&self) -> &[PeriodRecord] {
        self.records.get(1..).unwrap_or_default()
    }

    /// The period 0 record.
    pub fn initial(&self) -> Option<&PeriodRecord> {
        self.records.first()
    }

    /// The final period's record.
    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    /// Number of records, period 0 included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeriodRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Generates the period-by-period schedule for a fixed `payment`.
///
/// Every figure is rounded to cents as it is produced. The final period pays
/// whatever balance is left (so its payment may differ from `payment` by the
/// accumulated rounding residual) and always closes at exactly zero.
///
/// # Arguments
///
/// * `principal` - The amount borrowed, already rounded to cents.
/// * `rate` - The periodic rate for this term.
/// * `periods` - The number of payments.
/// * `payment` - The canonical (rounded) periodic payment.
///
/// # Errors
///
/// Returns [`LoanError::ZeroPeriods`] if `periods` is zero,
/// [`LoanError::InvalidInput`] for a non-positive principal or payment or an
/// interest amount too large to represent, and
/// [`LoanError::ResidualBalance`] if the schedule does not close at zero.
pub fn generate(principal: Money, rate: Rate, periods: u32, payment: Money) -> Result<Schedule> {
    if periods == 0 {
        return Err(LoanError::ZeroPeriods);
    }
    if principal <= Decimal::ZERO {
        return Err(LoanError::invalid_input("principal", "must be greater than zero"));
    }
    if payment <= Decimal::ZERO {
        return Err(LoanError::invalid_input("payment", "must be greater than zero"));
    }

    let principal = round2(principal);
    let payment = round2(payment);
    let zero = round2(Decimal::ZERO);

    let mut records = Vec::with_capacity(periods as usize + 1);
    records.push(PeriodRecord {
        period: 0,
        opening_balance: principal,
        payment: zero,
        interest: zero,
        principal: zero,
        closing_balance: principal,
    });

    let mut balance = principal;
    for period in 1..=periods {
        let interest = balance.checked_mul(rate).map(round2).ok_or_else(|| {
            LoanError::invalid_input("rate", format!("interest on {balance} at {rate} overflows"))
        })?;

        let record = if period == periods {
            let amortization = round2(balance);
            PeriodRecord {
                period,
                opening_balance: balance,
                payment: round2(interest + amortization),
                interest,
                principal: amortization,
                closing_balance: zero,
            }
        } else {
            let mut amortization = round2(payment - interest);
            let mut paid = payment;
            if amortization > balance {
                warn!("period {period}: payment {payment} exceeds balance {balance}, capping");
                amortization = balance;
                paid = round2(interest + amortization);
            }
            PeriodRecord {
                period,
                opening_balance: balance,
                payment: paid,
                interest,
                principal: amortization,
                closing_balance: round2(balance - amortization),
            }
        };

        debug!(
            "period {}: opening {} payment {} interest {} principal {} closing {}",
            record.period,
            record.opening_balance,
            record.payment,
            record.interest,
            record.principal,
            record.closing_balance
        );

        balance = record.closing_balance;
        records.push(record);
    }

    if !balance.is_zero() {
        return Err(LoanError::ResidualBalance(balance));
    }

    Ok(Schedule { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::fixed_payment;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn record(period: u32, values: [Money; 5]) -> PeriodRecord {
        let [opening_balance, payment, interest, principal, closing_balance] = values;
        PeriodRecord {
            period,
            opening_balance,
            payment,
            interest,
            principal,
            closing_balance,
        }
    }

    #[test]
    fn test_generate_six_periods() {
        let schedule = generate(dec!(1000), dec!(0.05), 6, dec!(197.02)).unwrap();

        let expected = vec![
            record(0, [dec!(1000.00), dec!(0), dec!(0), dec!(0), dec!(1000.00)]),
            record(1, [dec!(1000.00), dec!(197.02), dec!(50.00), dec!(147.02), dec!(852.98)]),
            record(2, [dec!(852.98), dec!(197.02), dec!(42.65), dec!(154.37), dec!(698.61)]),
            record(3, [dec!(698.61), dec!(197.02), dec!(34.93), dec!(162.09), dec!(536.52)]),
            record(4, [dec!(536.52), dec!(197.02), dec!(26.83), dec!(170.19), dec!(366.33)]),
            record(5, [dec!(366.33), dec!(197.02), dec!(18.32), dec!(178.70), dec!(187.63)]),
            record(6, [dec!(187.63), dec!(197.01), dec!(9.38), dec!(187.63), dec!(0)]),
        ];
        assert_eq!(schedule.records(), expected.as_slice());
    }

    #[test]
    fn test_final_period_absorbs_residual() {
        let schedule = generate(dec!(12000), dec!(0.10), 12, dec!(1761.16)).unwrap();
        assert_eq!(schedule.len(), 13);

        let last = schedule.last().unwrap();
        assert_eq!(last.period, 12);
        assert_eq!(last.opening_balance, dec!(1601.08));
        assert_eq!(last.interest, dec!(160.11));
        assert_eq!(last.principal, dec!(1601.08));
        assert_eq!(last.payment, dec!(1761.19));
        assert_eq!(last.closing_balance, dec!(0));

        for installment in &schedule.installments()[..11] {
            assert_eq!(installment.payment, dec!(1761.16));
        }
    }

    #[rstest]
    #[case(dec!(12000), dec!(0.10), 12)]
    #[case(dec!(50000), dec!(0.05), 6)]
    #[case(dec!(50000), dec!(0.15), 18)]
    #[case(dec!(1000000), dec!(0.15), 18)]
    #[case(dec!(60), dec!(0.10), 12)]
    #[case(dec!(1234.56), dec!(0), 6)]
    #[case(dec!(1000), dec!(0.05), 1)]
    fn test_schedule_invariants(#[case] principal: Money, #[case] rate: Rate, #[case] periods: u32) {
        let payment = round2(fixed_payment(principal, rate, periods).unwrap());
        let schedule = generate(principal, rate, periods, payment).unwrap();

        assert_eq!(schedule.len(), periods as usize + 1);
        assert_eq!(schedule.last().unwrap().closing_balance, dec!(0));

        let repaid: Money = schedule.installments().iter().map(|r| r.principal).sum();
        assert_eq!(repaid, principal);

        for (index, record) in schedule.iter().enumerate() {
            assert_eq!(record.period as usize, index);
            assert!(!record.closing_balance.is_sign_negative());
            if record.period > 0 {
                assert_eq!(record.opening_balance - record.principal, record.closing_balance);
                assert_eq!(record.interest + record.principal, record.payment);
            }
        }
    }

    #[test]
    fn test_zero_rate_has_no_interest() {
        let payment = round2(fixed_payment(dec!(1000), dec!(0), 6).unwrap());
        let schedule = generate(dec!(1000), dec!(0), 6, payment).unwrap();

        assert!(schedule.iter().all(|r| r.interest.is_zero()));
        assert_eq!(schedule.records()[1].payment, dec!(166.67));
        assert_eq!(schedule.last().unwrap().payment, dec!(166.65));
    }

    #[test]
    fn test_overpayment_is_capped_at_balance() {
        // 18 payments of 0.06 overshoot a principal of 1.00 at zero rate.
        let schedule = generate(dec!(1), dec!(0), 18, dec!(0.06)).unwrap();

        assert_eq!(schedule.records()[16].closing_balance, dec!(0.04));
        assert_eq!(schedule.records()[17].principal, dec!(0.04));
        assert_eq!(schedule.records()[17].payment, dec!(0.04));
        assert!(schedule.iter().skip(17).all(|r| r.closing_balance.is_zero()));
        assert!(schedule.iter().all(|r| !r.principal.is_sign_negative()));
    }

    #[test]
    fn test_generate_rejects_bad_input() {
        assert!(matches!(generate(dec!(1000), dec!(0.05), 0, dec!(10)), Err(LoanError::ZeroPeriods)));
        assert!(matches!(
            generate(dec!(0), dec!(0.05), 6, dec!(10)),
            Err(LoanError::InvalidInput { .. })
        ));
        assert!(matches!(
            generate(dec!(1000), dec!(0.05), 6, dec!(0)),
            Err(LoanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_overflowing_interest_is_an_error() {
        let result = generate(dec!(1000000), Decimal::MAX, 6, dec!(10));
        assert!(matches!(result, Err(LoanError::InvalidInput { .. })));
    }
}
