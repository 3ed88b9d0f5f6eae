use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CurrencyProfile;
use crate::format::CurrencyFormatter;
use crate::rounding::round2;
use crate::schedule::Schedule;
use crate::types::Money;

/// Totals derived from a generated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub principal: Money,
    pub total_interest: Money,
    pub total_repaid: Money,
    /// Canonical payment of every period but the last.
    pub periodic_payment: Money,
    /// Payment of the last period, which absorbs the rounding residual.
    pub final_payment: Money,
}

impl SummaryResult {
    pub fn final_payment_differs(&self) -> bool {
        self.final_payment != self.periodic_payment
    }

    /// The periodic payment as shown to the user, mentioning the last payment
    /// when it differs: `"$1,761.16 (last payment $1,761.19)"`.
    pub fn describe_payment(
        &self,
        formatter: &dyn CurrencyFormatter,
        profile: &CurrencyProfile,
    ) -> String {
        let periodic = formatter.format_in(self.periodic_payment, profile);
        if self.final_payment_differs() {
            format!(
                "{periodic} (last payment {})",
                formatter.format_in(self.final_payment, profile)
            )
        } else {
            periodic
        }
    }
}

/// Aggregates `schedule` into totals.
///
/// Interest is accumulated period by period with rounding after each addition,
/// the same way the schedule itself is built.
pub fn summarize(schedule: &Schedule, periodic_payment: Money) -> SummaryResult {
    let principal = schedule
        .initial()
        .map_or(Decimal::ZERO, |record| record.opening_balance);

    let total_interest = schedule
        .installments()
        .iter()
        .fold(round2(Decimal::ZERO), |total, record| round2(total + record.interest));

    let final_payment = schedule
        .installments()
        .last()
        .map_or(periodic_payment, |record| record.payment);

    SummaryResult {
        principal: round2(principal),
        total_interest,
        total_repaid: round2(principal + total_interest),
        periodic_payment: round2(periodic_payment),
        final_payment: round2(final_payment),
    }
}
