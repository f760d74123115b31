use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),
}

impl EmiError {
    /// Caller supplied a value outside the domain the engine accepts.
    pub fn is_validation(&self) -> bool {
        matches!(self, EmiError::InvalidInput { .. })
    }

    /// The inputs were accepted but the arithmetic degenerated.
    pub fn is_computation(&self) -> bool {
        matches!(
            self,
            EmiError::FinancialImpossibility(_)
                | EmiError::DivisionByZero { .. }
                | EmiError::NumericOverflow { .. }
        )
    }
}
