//! Calculator Module
//!
//! A stateless module that performs four-operation arithmetic on two operands
//! and serves it over REST, together with a single-page HTML form.
//!
//! ## Architecture
//!
//! - `domain::Service` contains the arithmetic
//! - `api::rest` extracts parameters, calls the service and shapes responses
//! - `config::CalculatorConfig` carries the module's tunables

// === PUBLIC EXPORTS ===
pub mod config;
pub mod domain;
pub use config::CalculatorConfig;
pub use domain::{CalculationError, Operation, Service};

// === TRANSPORT ===
pub mod api;

pub use api::rest::routes::router;
