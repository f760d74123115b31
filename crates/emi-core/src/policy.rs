//! Loan request policy: the bounds a front end enforces before the engine runs.
//!
//! The engine only rejects values it cannot compute with. The bounds here are
//! product policy, reported per field so a form can show the message next to
//! the input.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::{LoanParameters, ScheduleInput};
use crate::error::EmiError;
use crate::time_value::term_months_from_years;
use crate::types::{Money, Rate};
use crate::EmiResult;

pub const FIELD_LOAN_AMOUNT: &str = "loan-amount";
pub const FIELD_LOAN_TERM: &str = "loan-term";
pub const FIELD_INTEREST_RATE: &str = "interest-rate";

/// Bounds applied to a raw loan request. Loadable from JSON or YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicy {
    pub min_amount: Money,
    pub max_amount: Money,
    pub min_term_years: Decimal,
    pub max_term_years: Decimal,
    pub min_rate: Rate,
    pub max_rate: Rate,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            min_amount: dec!(1000),
            max_amount: dec!(10_000_000),
            min_term_years: dec!(1),
            max_term_years: dec!(30),
            min_rate: dec!(0),
            max_rate: dec!(30),
        }
    }
}

/// Raw values as entered: amount, term in years, annual rate in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanRequest {
    pub amount: Money,
    pub term_years: Decimal,
    pub interest_rate: Rate,
}

impl Default for LoanRequest {
    fn default() -> Self {
        Self {
            amount: dec!(100000),
            term_years: dec!(1),
            interest_rate: dec!(10),
        }
    }
}

/// A field outside its bounds, with the message to show beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl LoanPolicy {
    /// Reject policies whose bounds are inverted or admit a non-positive amount.
    pub fn check_invariants(&self) -> EmiResult<()> {
        if self.min_amount <= Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "min_amount".into(),
                reason: "Minimum amount must be positive".into(),
            });
        }
        let pairs = [
            ("amount", self.min_amount, self.max_amount),
            ("term_years", self.min_term_years, self.max_term_years),
            ("rate", self.min_rate, self.max_rate),
        ];
        for (name, min, max) in pairs {
            if min > max {
                return Err(EmiError::InvalidInput {
                    field: format!("max_{name}"),
                    reason: format!("Maximum {max} is below minimum {min}"),
                });
            }
        }
        if self.min_term_years * dec!(12) < Decimal::ONE {
            return Err(EmiError::InvalidInput {
                field: "min_term_years".into(),
                reason: "Minimum term must cover at least one month".into(),
            });
        }
        if self.min_rate < Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "min_rate".into(),
                reason: "Minimum rate cannot be negative".into(),
            });
        }
        Ok(())
    }

    /// Every field outside its bounds. Empty when the request is acceptable.
    pub fn violations(&self, request: &LoanRequest) -> Vec<FieldViolation> {
        [
            bounds_violation(FIELD_LOAN_AMOUNT, request.amount, self.min_amount, self.max_amount),
            bounds_violation(FIELD_LOAN_TERM, request.term_years, self.min_term_years, self.max_term_years),
            bounds_violation(FIELD_INTEREST_RATE, request.interest_rate, self.min_rate, self.max_rate),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Term bounds in whole months: the shortest term that reaches
    /// `min_term_years` and the longest that stays within `max_term_years`.
    pub fn term_month_bounds(&self) -> (Decimal, Decimal) {
        (
            (self.min_term_years * dec!(12)).ceil(),
            (self.max_term_years * dec!(12)).floor(),
        )
    }

    /// Violations for an engine request. A term given in years is held to the
    /// year bounds; a term given only in months is held to the same bounds
    /// expressed in months.
    pub fn input_violations(&self, input: &ScheduleInput) -> Vec<FieldViolation> {
        let term = match (input.term_years, input.term_months) {
            (Some(years), _) => {
                bounds_violation(FIELD_LOAN_TERM, years, self.min_term_years, self.max_term_years)
            }
            (None, Some(months)) => {
                let (min_months, max_months) = self.term_month_bounds();
                bounds_violation(FIELD_LOAN_TERM, Decimal::from(months), min_months, max_months)
            }
            (None, None) => None,
        };
        [
            bounds_violation(FIELD_LOAN_AMOUNT, input.principal, self.min_amount, self.max_amount),
            term,
            bounds_violation(FIELD_INTEREST_RATE, input.annual_rate_percent, self.min_rate, self.max_rate),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Check the request against the bounds and convert it to engine parameters.
    ///
    /// Never clamps: the first violation is returned as an error.
    pub fn validate(&self, request: &LoanRequest) -> EmiResult<LoanParameters> {
        if let Some(v) = self.violations(request).into_iter().next() {
            return Err(EmiError::InvalidInput {
                field: v.field,
                reason: v.message,
            });
        }
        let term_months = term_months_from_years(request.term_years)?;
        LoanParameters::new(request.amount, term_months, request.interest_rate)
    }
}

/// Below-minimum wins over above-maximum.
fn bounds_violation(field: &str, value: Decimal, min: Decimal, max: Decimal) -> Option<FieldViolation> {
    let message = if value < min {
        format!("Minimum value is {}", min.normalize())
    } else if value > max {
        format!("Maximum value is {}", max.normalize())
    } else {
        return None;
    };
    Some(FieldViolation {
        field: field.to_string(),
        message,
    })
}
