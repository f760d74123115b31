//! Fixed-rate amortization: the schedule engine and the read-only views
//! derived from its output.

pub mod schedule;
pub mod summary;

#[cfg(feature = "views")]
pub mod views;

pub use schedule::{
    calculate_emi, compute_schedule, Installment, LoanParameters, Schedule, MAX_TERM_MONTHS,
};
pub use summary::{summarize, ScheduleSummary};
