pub mod amortization;
pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "policy")]
pub mod policy;

#[cfg(feature = "calendar")]
pub mod calendar;

pub use error::EmiError;
pub use types::*;

/// Standard result type for all EMI operations
pub type EmiResult<T> = Result<T, EmiError>;
