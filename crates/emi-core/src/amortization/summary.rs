use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::Installment;
use crate::types::Money;

/// Aggregate totals over a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Level payment (the first installment's payment).
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// Should equal the original principal.
    pub total_principal: Money,
    pub total_paid: Money,
    pub installment_count: u32,
}

/// Reduce a schedule to its totals. An empty schedule yields zeros.
pub fn summarize(schedule: &[Installment]) -> ScheduleSummary {
    let (total_interest, total_principal, total_paid) = schedule.iter().fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(i, p, t), inst| (i + inst.interest, p + inst.principal, t + inst.payment),
    );

    ScheduleSummary {
        monthly_payment: schedule.first().map(|i| i.payment).unwrap_or_default(),
        total_interest,
        total_principal,
        total_paid,
        installment_count: schedule.len() as u32,
    }
}
