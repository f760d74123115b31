use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::Value;

use emi_core::amortization::schedule;
use emi_core::calendar::{self, CalendarRequest, DEFAULT_EVENT_TITLE};
use emi_core::policy::LoanPolicy;

use super::loan::{resolve_loan, LoanArgs};

/// Arguments for the calendar reminder link
#[derive(Args)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Day of month for the reminder (clamped to 1-28)
    #[arg(long, default_value_t = 1)]
    pub day: u32,

    /// Event title; the first payment amount is appended
    #[arg(long, default_value = DEFAULT_EVENT_TITLE)]
    pub title: String,

    /// Any date in the month of the first payment (YYYY-MM-DD, default today)
    #[arg(long)]
    pub start: Option<NaiveDate>,
}

pub fn run_calendar(
    args: CalendarArgs,
    policy: Option<&LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(&args.loan, policy)?;
    let installments = schedule::calculate_emi(&loan)?.result.installments;

    let request = CalendarRequest {
        title: args.title,
        day_of_month: args.day,
        start_month: args.start.unwrap_or_else(|| Local::now().date_naive()),
    };
    if request.day_of_month != request.day_of_month.clamp(1, calendar::MAX_PAYMENT_DAY) {
        tracing::warn!(day = request.day_of_month, "payment day clamped to 1-28");
    }

    let invite = calendar::calendar_link(&installments, &request)?;
    Ok(serde_json::to_value(invite)?)
}
