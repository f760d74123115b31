use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use emi_core::amortization::schedule::{self, ScheduleInput};
use emi_core::amortization::{summarize, views};
use emi_core::policy::{LoanPolicy, LoanRequest};

use crate::input;

/// Loan terms shared by every schedule-producing command
#[derive(Args, Clone)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount (principal)
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<Decimal>,

    /// Term in years (fractional years are truncated to whole months)
    #[arg(long, conflicts_with = "months")]
    pub years: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Annual interest rate in percent (e.g. 10 for 10%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,
}

/// Arguments for the policy check
#[derive(Args)]
pub struct ValidateArgs {
    /// Loan amount (principal)
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<Decimal>,

    /// Term in years
    #[arg(long, allow_hyphen_values = true)]
    pub years: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,
}

/// Read the loan terms from a file, piped stdin, or flags (in that order)
/// and apply the request policy when one is active.
pub fn resolve_loan(
    args: &LoanArgs,
    policy: Option<&LoanPolicy>,
) -> Result<ScheduleInput, Box<dyn std::error::Error>> {
    let loan: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .amount
            .ok_or("--amount is required (or provide --input)")?;
        let annual_rate_percent = args
            .rate
            .ok_or("--rate is required (or provide --input)")?;
        if args.years.is_none() && args.months.is_none() {
            return Err("--years or --months is required (or provide --input)".into());
        }

        ScheduleInput {
            principal,
            term_months: args.months,
            term_years: args.years,
            annual_rate_percent,
        }
    };

    if let Some(policy) = policy {
        enforce_policy(policy, &loan)?;
    }
    Ok(loan)
}

/// Reject loans outside the policy bounds. A term given in months is checked
/// against the year bounds converted to months.
fn enforce_policy(
    policy: &LoanPolicy,
    loan: &ScheduleInput,
) -> Result<(), Box<dyn std::error::Error>> {
    let violations: Vec<String> = policy
        .input_violations(loan)
        .into_iter()
        .map(|v| {
            tracing::debug!(field = %v.field, message = %v.message, "policy violation");
            format!("{}: {}", v.field, v.message)
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; ").into())
    }
}

pub fn run_schedule(
    args: LoanArgs,
    policy: Option<&LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(&args, policy)?;
    let result = schedule::calculate_emi(&loan)?;
    tracing::info!(
        installments = result.result.installments.len(),
        monthly_payment = %result.result.monthly_payment,
        "schedule computed"
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(
    args: LoanArgs,
    policy: Option<&LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(&args, policy)?;
    let installments = schedule::calculate_emi(&loan)?.result.installments;
    Ok(json!({
        "summary": summarize(&installments),
        "split": views::principal_interest_split(&installments),
    }))
}

pub fn run_chart(
    args: LoanArgs,
    policy: Option<&LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(&args, policy)?;
    let installments = schedule::calculate_emi(&loan)?.result.installments;
    Ok(serde_json::to_value(views::chart_series(&installments))?)
}

pub fn run_validate(
    args: ValidateArgs,
    policy: &LoanPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let defaults = LoanRequest::default();
    let request = LoanRequest {
        amount: args.amount.unwrap_or(defaults.amount),
        term_years: args.years.unwrap_or(defaults.term_years),
        interest_rate: args.rate.unwrap_or(defaults.interest_rate),
    };

    let violations = policy.violations(&request);
    let term_months = if violations.is_empty() {
        Some(policy.validate(&request)?.term_months)
    } else {
        None
    };

    Ok(json!({
        "valid": violations.is_empty(),
        "request": request,
        "term_months": term_months,
        "violations": violations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(term_months: Option<u32>, term_years: Option<Decimal>) -> ScheduleInput {
        ScheduleInput {
            principal: dec!(100000),
            term_months,
            term_years,
            annual_rate_percent: dec!(10),
        }
    }

    #[test]
    fn test_policy_accepts_default_loan() {
        let policy = LoanPolicy::default();
        assert!(enforce_policy(&policy, &loan(None, Some(dec!(1)))).is_ok());
    }

    #[test]
    fn test_policy_rejects_long_term_in_years() {
        let policy = LoanPolicy::default();
        let err = enforce_policy(&policy, &loan(None, Some(dec!(40)))).unwrap_err();
        assert_eq!(err.to_string(), "loan-term: Maximum value is 30");
    }

    #[test]
    fn test_term_in_months_held_to_month_bounds() {
        let policy = LoanPolicy::default();
        assert!(enforce_policy(&policy, &loan(Some(360), None)).is_ok());

        let err = enforce_policy(&policy, &loan(Some(6), None)).unwrap_err();
        assert_eq!(err.to_string(), "loan-term: Minimum value is 12");
    }

    #[test]
    fn test_policy_rejects_huge_term_in_months() {
        let policy = LoanPolicy::default();
        let huge = ScheduleInput {
            principal: dec!(1000),
            annual_rate_percent: dec!(0),
            ..loan(Some(4_000_000_000), None)
        };
        let err = enforce_policy(&policy, &huge).unwrap_err();
        assert_eq!(err.to_string(), "loan-term: Maximum value is 360");
    }

    #[test]
    fn test_policy_reports_every_field() {
        let policy = LoanPolicy::default();
        let bad = ScheduleInput {
            principal: dec!(10),
            annual_rate_percent: dec!(45),
            ..loan(None, Some(dec!(1)))
        };
        let err = enforce_policy(&policy, &bad).unwrap_err().to_string();
        assert_eq!(
            err,
            "loan-amount: Minimum value is 1000; interest-rate: Maximum value is 30"
        );
    }

    #[test]
    fn test_validate_reports_term_months() {
        let args = ValidateArgs {
            amount: Some(dec!(50000)),
            years: Some(dec!(2.5)),
            rate: None,
        };
        let out = run_validate(args, &LoanPolicy::default()).unwrap();
        assert_eq!(out["valid"], true);
        assert_eq!(out["term_months"], 30);
        assert_eq!(out["violations"].as_array().map(|v| v.len()), Some(0));
    }

    #[test]
    fn test_validate_lists_violations() {
        let args = ValidateArgs {
            amount: Some(dec!(100)),
            years: None,
            rate: None,
        };
        let out = run_validate(args, &LoanPolicy::default()).unwrap();
        assert_eq!(out["valid"], false);
        assert!(out["term_months"].is_null());
        assert_eq!(out["violations"][0]["field"], "loan-amount");
        assert_eq!(out["violations"][0]["message"], "Minimum value is 1000");
    }
}
