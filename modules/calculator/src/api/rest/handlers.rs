use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Uri;
use axum::response::Html;
use axum::{Extension, Json};
use tracing::info;
use utoipa::OpenApi;

use super::dto::{CalculateRequest, CalculationResult, HealthResponse};
use super::error::Problem;
use super::openapi::ApiDoc;
use super::page::RenderedPage;
use crate::domain::Service;

/// Perform a calculation.
///
/// Calculation errors are part of the `200` payload; only malformed requests
/// are rejected (by the [`CalculateRequest`] extractor).
#[utoipa::path(
    post,
    path = "/calculate",
    tag = "calculator",
    request_body(
        content = CalculateRequest,
        content_type = "application/x-www-form-urlencoded",
        description = "Operands and operation tag; also accepted as query string or JSON"
    ),
    responses(
        (status = 200, description = "Calculation outcome, check `error` first", body = CalculationResult),
        (status = 400, description = "Missing or unparsable parameter", body = Problem, content_type = "application/problem+json"),
        (status = 415, description = "Unsupported request body", body = Problem, content_type = "application/problem+json")
    )
)]
#[allow(clippy::unused_async)]
pub async fn calculate(
    Extension(svc): Extension<Arc<Service>>,
    req: CalculateRequest,
) -> Json<CalculationResult> {
    let outcome = svc.calculate(req.num1, req.num2, &req.operation);
    info!(
        operation = %req.operation,
        ok = outcome.is_ok(),
        "Calculation requested"
    );
    Json(outcome.into())
}

/// Serve the calculator page.
#[allow(clippy::unused_async)]
pub async fn index(Extension(page): Extension<RenderedPage>) -> Html<Bytes> {
    Html(page.into_bytes())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    tag = "calculator",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

#[allow(clippy::unused_async)]
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[allow(clippy::unused_async)]
pub async fn not_found(uri: Uri) -> Problem {
    Problem::not_found(format!("No route for '{}'", uri.path())).with_request_context(uri.path())
}
