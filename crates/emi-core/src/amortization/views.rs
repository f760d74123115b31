//! Chart-ready views over a schedule: per-period series for a line chart and
//! the principal/interest split for a doughnut chart.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::Installment;
use crate::amortization::summary::summarize;
use crate::time_value::round_money;
use crate::types::{Money, Rate};

pub const REMAINING_BALANCE_LABEL: &str = "Remaining Balance";
pub const INTEREST_PAID_LABEL: &str = "Interest Paid";
pub const PRINCIPAL_PAID_LABEL: &str = "Principal Paid";

/// One named line of values, one value per installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub label: String,
    pub data: Vec<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// "Month 1", "Month 2", ...
    pub labels: Vec<String>,
    /// Remaining balance, interest paid and principal paid, in that order.
    pub series: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSlice {
    pub label: String,
    pub amount: Money,
    /// Share of total paid, in percent (2 dp).
    pub share_pct: Rate,
}

/// Principal vs total interest over the life of the loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalInterestSplit {
    pub total_paid: Money,
    pub slices: Vec<SplitSlice>,
}

pub fn chart_series(schedule: &[Installment]) -> ChartSeries {
    let labels = schedule
        .iter()
        .map(|i| format!("Month {}", i.installment))
        .collect();

    let column = |label: &str, pick: fn(&Installment) -> Money| NamedSeries {
        label: label.to_string(),
        data: schedule.iter().map(pick).collect(),
    };

    ChartSeries {
        labels,
        series: vec![
            column(REMAINING_BALANCE_LABEL, |i| i.remaining),
            column(INTEREST_PAID_LABEL, |i| i.interest),
            column(PRINCIPAL_PAID_LABEL, |i| i.principal),
        ],
    }
}

pub fn principal_interest_split(schedule: &[Installment]) -> PrincipalInterestSplit {
    let summary = summarize(schedule);
    let total = summary.total_principal + summary.total_interest;

    let slice = |label: &str, amount: Money| SplitSlice {
        label: label.to_string(),
        amount,
        share_pct: if total.is_zero() {
            Decimal::ZERO
        } else {
            round_money(amount / total * dec!(100))
        },
    };

    PrincipalInterestSplit {
        total_paid: total,
        slices: vec![
            slice("Principal", summary.total_principal),
            slice("Total Interest", summary.total_interest),
        ],
    }
}
