//! RFC 9457 Problem Details returned for malformed requests.
//!
//! Calculation errors are not problems: they travel inside a `200` payload.
//! Problems cover what happens before the calculation runs (missing or
//! unparsable parameters, unsupported bodies, unknown routes).

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

pub const MISSING_PARAMETER: &str = "MISSING_PARAMETER";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const MALFORMED_BODY: &str = "MALFORMED_BODY";
pub const MALFORMED_QUERY: &str = "MALFORMED_QUERY";
pub const UNSUPPORTED_MEDIA_TYPE: &str = "UNSUPPORTED_MEDIA_TYPE";
pub const NOT_FOUND: &str = "NOT_FOUND";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Problem", description = "RFC 9457 Problem Details for HTTP APIs")]
#[must_use]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code, serialized as u16.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// A human-readable explanation specific to this occurrence.
    pub detail: String,
    /// The request path this problem occurred on.
    pub instance: String,
    /// Machine-readable error code.
    pub code: String,
    pub trace_id: Option<String>,
    /// Per-parameter violations for 4xx problems.
    pub errors: Option<Vec<ValidationViolation>>,
}

/// Individual validation violation for a specific request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationViolation {
    /// Parameter name, e.g. "num1"
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ValidationViolation {
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: format!("Required parameter '{field}' is not present"),
            code: Some(MISSING_PARAMETER.to_owned()),
        }
    }

    #[must_use]
    pub fn not_a_number(field: &str, value: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: format!("Parameter '{field}' must be a number, got '{value}'"),
            code: Some(INVALID_PARAMETER.to_owned()),
        }
    }
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    /// Problem carrying the canonical reason phrase of `status` as its title.
    pub fn from_status(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Error"), detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::from_status(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::from_status(StatusCode::NOT_FOUND, detail).with_code(NOT_FOUND)
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE, detail)
            .with_code(UNSUPPORTED_MEDIA_TYPE)
    }

    /// `400` summarising parameter violations.
    ///
    /// The code is `MISSING_PARAMETER` when any parameter is absent,
    /// `INVALID_PARAMETER` otherwise.
    pub fn invalid_parameters(violations: Vec<ValidationViolation>) -> Self {
        let any_missing = violations
            .iter()
            .any(|v| v.code.as_deref() == Some(MISSING_PARAMETER));
        let code = if any_missing {
            MISSING_PARAMETER
        } else {
            INVALID_PARAMETER
        };
        let detail = violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        Self::bad_request(detail)
            .with_code(code)
            .with_errors(violations)
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<ValidationViolation>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Enrich with the request path and the current span id, if any.
    pub fn with_request_context(mut self, path: impl Into<String>) -> Self {
        self = self.with_instance(path);
        if let Some(id) = tracing::Span::current().id() {
            self = self.with_trace_id(id.into_u64().to_string());
        }
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_vec(&self) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize problem");
                status.into_response()
            }
        }
    }
}
