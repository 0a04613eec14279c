//! `OpenAPI` document for the calculator REST surface.

use utoipa::OpenApi;

use super::dto::{CalculateRequest, CalculationResult, HealthResponse};
use super::error::{Problem, ValidationViolation};
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calculator API",
        description = "Add, subtract, multiply or divide two numbers"
    ),
    paths(handlers::calculate, handlers::health),
    components(schemas(
        CalculateRequest,
        CalculationResult,
        HealthResponse,
        Problem,
        ValidationViolation
    )),
    tags((name = "calculator", description = "Four-operation arithmetic"))
)]
pub struct ApiDoc;
