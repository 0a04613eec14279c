//! Domain service for calculator
//!
//! Contains the core business logic: one pure function over two operands and
//! an operation tag.

use tracing::debug;

use super::error::CalculationError;
use super::operation::Operation;

/// Domain service that performs the arithmetic.
///
/// Stateless; shared across requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Service;

impl Service {
    /// Create a new service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Apply the operation named by `operation` to `num1` and `num2`.
    ///
    /// # Errors
    /// - [`CalculationError::InvalidOperation`] if `operation` is not one of
    ///   `add`, `subtract`, `multiply`, `divide`
    /// - [`CalculationError::DivisionByZero`] for `divide` with `num2 == 0`
    #[allow(clippy::unused_self)]
    pub fn calculate(
        &self,
        num1: f64,
        num2: f64,
        operation: &str,
    ) -> Result<f64, CalculationError> {
        let op = operation.parse::<Operation>().inspect_err(|_| {
            debug!(operation, "rejecting unknown operation");
        })?;

        let result = op.apply(num1, num2);
        debug!(num1, num2, %op, ok = result.is_ok(), "calculation performed");
        result
    }
}
