use thiserror::Error;

/// Calculation failures reported to the caller in the `error` field.
///
/// The `Display` output is the user-visible message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// The rejected tag is kept for logs; it never reaches the message.
    #[error("Invalid operation")]
    InvalidOperation { operation: String },
}

impl CalculationError {
    #[must_use]
    pub fn invalid_operation(operation: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
        }
    }
}
