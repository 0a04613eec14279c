//! Domain layer for the calculator module
//!
//! Contains the arithmetic and its error taxonomy.

pub mod error;
pub mod operation;
pub mod service;

pub use error::CalculationError;
pub use operation::Operation;
pub use service::Service;
