pub mod calendar;
pub mod loan;
