//! Calculator Server
//!
//! Hosts the `calculator` module behind an axum HTTP server: layered
//! configuration, structured logging, request middleware and graceful
//! shutdown.

pub mod config;
pub mod humantime_serde;
pub mod logging;
pub mod request_id;
pub mod server;
pub mod signals;

pub use config::{AppConfig, CliArgs};
