use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use emi_core::amortization::schedule::{self, Installment, ScheduleInput};
use emi_core::amortization::{summarize, views};
use emi_core::calendar::{self, CalendarRequest};
use emi_core::policy::{LoanPolicy, LoanRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_schedule(schedule_json: &str) -> NapiResult<Vec<Installment>> {
    serde_json::from_str(schedule_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Views over a computed schedule (JSON array of installments)
// ---------------------------------------------------------------------------

#[napi]
pub fn schedule_summary(schedule_json: String) -> NapiResult<String> {
    let installments = parse_schedule(&schedule_json)?;
    serde_json::to_string(&summarize(&installments)).map_err(to_napi_error)
}

#[napi]
pub fn chart_series(schedule_json: String) -> NapiResult<String> {
    let installments = parse_schedule(&schedule_json)?;
    serde_json::to_string(&views::chart_series(&installments)).map_err(to_napi_error)
}

#[napi]
pub fn principal_interest_split(schedule_json: String) -> NapiResult<String> {
    let installments = parse_schedule(&schedule_json)?;
    serde_json::to_string(&views::principal_interest_split(&installments)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ValidateInput {
    request: LoanRequest,
    #[serde(default)]
    policy: Option<LoanPolicy>,
}

/// Returns the list of field violations (empty when the request is valid).
#[napi]
pub fn validate_loan_request(input_json: String) -> NapiResult<String> {
    let input: ValidateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = input.policy.unwrap_or_default();
    policy.check_invariants().map_err(to_napi_error)?;
    serde_json::to_string(&policy.violations(&input.request)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calendar export
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CalendarInput {
    schedule: Vec<Installment>,
    request: CalendarRequest,
}

#[napi]
pub fn calendar_link(input_json: String) -> NapiResult<String> {
    let input: CalendarInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let invite = calendar::calendar_link(&input.schedule, &input.request).map_err(to_napi_error)?;
    serde_json::to_string(&invite).map_err(to_napi_error)
}
