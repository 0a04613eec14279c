//! Route registration for the calculator module

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use super::page::RenderedPage;
use crate::config::CalculatorConfig;
use crate::domain::Service;

/// Build the calculator router.
///
/// - `GET /` calculator page
/// - `POST /calculate` perform a calculation
/// - `GET /health` liveness probe
/// - `GET /openapi.json` `OpenAPI` document
///
/// Any other path answers with a `404` problem.
#[must_use]
pub fn router(service: Arc<Service>, config: &CalculatorConfig) -> Router {
    tracing::debug!(page_title = %config.page_title, "Registering calculator routes");

    Router::new()
        .route("/", get(handlers::index))
        .route("/calculate", post(handlers::calculate))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi))
        .fallback(handlers::not_found)
        .layer(Extension(service))
        .layer(Extension(RenderedPage::new(&config.page_title)))
}
