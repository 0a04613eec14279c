#![allow(clippy::unwrap_used, clippy::float_cmp)]

//! Arithmetic laws of the calculator service over arbitrary finite operands.

use calculator::api::rest::dto::CalculationResult;
use calculator::{CalculationError, Service};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f64> {
    use prop::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

fn unknown_operation() -> impl Strategy<Value = String> {
    "\\PC{0,12}".prop_filter("must not be a supported tag", |s| {
        !matches!(s.as_str(), "add" | "subtract" | "multiply" | "divide")
    })
}

proptest! {
    #[test]
    fn prop_add(a in finite(), b in finite()) {
        prop_assert_eq!(Service::new().calculate(a, b, "add"), Ok(a + b));
    }

    #[test]
    fn prop_subtract(a in finite(), b in finite()) {
        prop_assert_eq!(Service::new().calculate(a, b, "subtract"), Ok(a - b));
    }

    #[test]
    fn prop_multiply(a in finite(), b in finite()) {
        prop_assert_eq!(Service::new().calculate(a, b, "multiply"), Ok(a * b));
    }

    #[test]
    fn prop_divide_by_zero(a in any::<f64>()) {
        let dto = CalculationResult::from(Service::new().calculate(a, 0.0, "divide"));
        prop_assert_eq!(dto.error.as_deref(), Some("Cannot divide by zero"));
        prop_assert_eq!(dto.result, 0.0);
    }

    #[test]
    fn prop_divide(a in finite(), b in finite().prop_filter("non-zero", |b| *b != 0.0)) {
        prop_assert_eq!(Service::new().calculate(a, b, "divide"), Ok(a / b));
    }

    #[test]
    fn prop_unknown_operation(a in any::<f64>(), b in any::<f64>(), op in unknown_operation()) {
        let outcome = Service::new().calculate(a, b, &op);
        prop_assert_eq!(&outcome, &Err(CalculationError::invalid_operation(op.as_str())));

        let dto = CalculationResult::from(outcome);
        prop_assert_eq!(dto.error.as_deref(), Some("Invalid operation"));
        prop_assert_eq!(dto.result, 0.0);
    }
}
