//! Fixed-rate loan amortization (EMI schedules).
//!
//! Produces the month-by-month breakdown of a level-payment loan: payment,
//! interest portion, principal portion and remaining balance. Every monetary
//! field is carried in cents from one period to the next; the final period
//! absorbs whatever rounding drift has accumulated so the loan closes at
//! exactly zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::summary::{summarize, ScheduleSummary};
use crate::error::EmiError;
use crate::time_value::{annuity_payment, monthly_rate, round_money, term_months_from_years};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::EmiResult;

/// Longest term the engine will compute (100 years of monthly payments).
pub const MAX_TERM_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan terms accepted by the engine, already rounded to the precision it
/// computes with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed, in cents precision.
    pub principal: Money,
    /// Number of monthly payments.
    pub term_months: u32,
    /// Annual nominal rate as a percentage (10 = 10%).
    pub annual_rate_percent: Rate,
}

impl LoanParameters {
    /// Validate against the engine's domain and round to cents.
    pub fn new(principal: Money, term_months: u32, annual_rate_percent: Rate) -> EmiResult<Self> {
        validate_domain(principal, term_months, annual_rate_percent)?;

        let principal = round_money(principal);
        if principal.is_zero() {
            return Err(EmiError::InvalidInput {
                field: "principal".into(),
                reason: "Principal rounds to zero at cent precision".into(),
            });
        }

        Ok(Self {
            principal,
            term_months,
            annual_rate_percent: round_money(annual_rate_percent),
        })
    }

    pub fn schedule(&self) -> EmiResult<Schedule> {
        compute_schedule(self.principal, self.term_months, self.annual_rate_percent)
    }
}

/// One payment period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based period number.
    pub installment: u32,
    /// Total paid this period (interest + principal).
    pub payment: Money,
    pub interest: Money,
    /// Portion of the payment that reduces the balance.
    pub principal: Money,
    /// Balance outstanding after this payment.
    pub remaining: Money,
}

/// Ordered installments, one per month of the term.
pub type Schedule = Vec<Installment>;

/// Request for the enveloped schedule calculation.
///
/// Exactly one of `term_months` / `term_years` is expected; when both are
/// given they must agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_years: Option<Decimal>,
    pub annual_rate_percent: Rate,
}

/// Full schedule with its level payment and aggregate totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub summary: ScheduleSummary,
    pub installments: Schedule,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the amortization schedule of a fixed-rate, level-payment loan.
///
/// `principal` and `annual_rate_percent` are rounded to 2 dp before use.
/// Returns exactly `term_months` installments, or an error and no schedule.
pub fn compute_schedule(
    principal: Money,
    term_months: u32,
    annual_rate_percent: Rate,
) -> EmiResult<Schedule> {
    let params = LoanParameters::new(principal, term_months, annual_rate_percent)?;
    let rate = monthly_rate(params.annual_rate_percent);
    let level_payment = round_money(annuity_payment(params.principal, rate, term_months)?);

    let mut schedule: Schedule = Vec::with_capacity(term_months as usize);
    let mut balance = params.principal;

    for period in 1..=term_months {
        let interest = round_money(balance.checked_mul(rate).ok_or_else(|| {
            EmiError::NumericOverflow {
                context: format!("interest for period {period}"),
            }
        })?);

        let mut capital = if period == term_months {
            balance
        } else {
            level_payment - interest
        };

        if capital < Decimal::ZERO {
            return Err(EmiError::FinancialImpossibility(format!(
                "Payment {level_payment} does not cover interest {interest} in period {period}"
            )));
        }

        // A payment rounded up on a tiny loan can clear the balance early;
        // never repay more than is owed.
        capital = capital.min(balance);
        balance -= capital;

        schedule.push(Installment {
            installment: period,
            payment: interest + capital,
            interest,
            principal: capital,
            remaining: balance,
        });
    }

    Ok(schedule)
}

/// Schedule plus summary, wrapped in the standard computation envelope.
pub fn calculate_emi(input: &ScheduleInput) -> EmiResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let term_months = resolve_term_months(input)?;

    let principal = round_money(input.principal);
    if principal != input.principal {
        warnings.push(format!(
            "Principal {} rounded to {} (cent precision)",
            input.principal, principal
        ));
    }
    let rate = round_money(input.annual_rate_percent);
    if rate != input.annual_rate_percent {
        warnings.push(format!(
            "Interest rate {}% rounded to {}%",
            input.annual_rate_percent, rate
        ));
    }

    let installments = compute_schedule(input.principal, term_months, input.annual_rate_percent)?;
    let summary = summarize(&installments);

    if rate.is_zero() {
        warnings.push("Zero interest rate: principal repaid in equal instalments".into());
    }
    if let Some(last) = installments.last() {
        let adjustment = last.payment - summary.monthly_payment;
        if installments.len() > 1 && !adjustment.is_zero() {
            warnings.push(format!(
                "Final installment adjusted by {adjustment} to clear rounding drift"
            ));
        }
    }

    let output = ScheduleOutput {
        monthly_payment: summary.monthly_payment,
        summary,
        installments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate annuity amortization (EMI) — cent rounding per period, final-period balance correction",
        &serde_json::json!({
            "principal": principal.to_string(),
            "term_months": term_months,
            "annual_rate_percent": rate.to_string(),
            "monthly_rate": monthly_rate(rate).to_string(),
            "rounding": "half away from zero, 2 dp",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_domain(principal: Money, term_months: u32, annual_rate_percent: Rate) -> EmiResult<()> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if term_months < 1 {
        return Err(EmiError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(EmiError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    Ok(())
}

fn resolve_term_months(input: &ScheduleInput) -> EmiResult<u32> {
    match (input.term_months, input.term_years) {
        (Some(months), None) => Ok(months),
        (None, Some(years)) => term_months_from_years(years),
        (Some(months), Some(years)) => {
            let from_years = term_months_from_years(years)?;
            if from_years != months {
                return Err(EmiError::InvalidInput {
                    field: "term_months".into(),
                    reason: format!(
                        "term_months ({months}) disagrees with term_years ({years} = {from_years} months)"
                    ),
                });
            }
            Ok(months)
        }
        (None, None) => Err(EmiError::InvalidInput {
            field: "term_months".into(),
            reason: "Either term_months or term_years is required".into(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
