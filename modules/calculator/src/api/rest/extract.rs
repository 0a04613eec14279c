//! Parameter extraction for `POST /calculate`.
//!
//! Parameters are read from the query string first, then from the body when
//! it is `application/x-www-form-urlencoded` or `application/json`. The first
//! occurrence of a name wins, so the query string overrides the body.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use serde_json::Value;
use tracing::debug;

use super::dto::CalculateRequest;
use super::error::{MALFORMED_BODY, MALFORMED_QUERY, Problem, ValidationViolation};

const NUM1: &str = "num1";
const NUM2: &str = "num2";
const OPERATION: &str = "operation";

/// Raw, not yet validated parameter values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct RawParams {
    num1: Option<String>,
    num2: Option<String>,
    operation: Option<String>,
}

impl RawParams {
    /// Record `value` under `name` unless the name was already seen.
    fn offer(&mut self, name: &str, value: String) {
        let slot = match name {
            NUM1 => &mut self.num1,
            NUM2 => &mut self.num2,
            OPERATION => &mut self.operation,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn offer_pairs(&mut self, pairs: Vec<(String, String)>) {
        for (name, value) in pairs {
            self.offer(&name, value);
        }
    }

    fn validate(self) -> Result<CalculateRequest, Vec<ValidationViolation>> {
        let mut violations = Vec::new();
        let num1 = parse_operand(NUM1, self.num1.as_deref(), &mut violations);
        let num2 = parse_operand(NUM2, self.num2.as_deref(), &mut violations);
        if self.operation.is_none() {
            violations.push(ValidationViolation::missing(OPERATION));
        }

        match (num1, num2, self.operation) {
            (Some(num1), Some(num2), Some(operation)) if violations.is_empty() => {
                Ok(CalculateRequest {
                    num1,
                    num2,
                    operation,
                })
            }
            _ => Err(violations),
        }
    }
}

fn parse_operand(
    field: &str,
    raw: Option<&str>,
    violations: &mut Vec<ValidationViolation>,
) -> Option<f64> {
    let Some(raw) = raw else {
        violations.push(ValidationViolation::missing(field));
        return None;
    };
    let value = parse_number(raw);
    if value.is_none() {
        violations.push(ValidationViolation::not_a_number(field, raw));
    }
    value
}

/// Parse a decimal number.
///
/// Non-finite values are only spelled `NaN` and `Infinity`, optionally
/// signed. A single trailing `d`, `D`, `f` or `F` type suffix is ignored.
fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (negative, magnitude) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let value = match magnitude {
        "NaN" => f64::NAN,
        "Infinity" => f64::INFINITY,
        _ if magnitude.starts_with(|c: char| c.is_ascii_digit() || c == '.') => magnitude
            .strip_suffix(['d', 'D', 'f', 'F'])
            .unwrap_or(magnitude)
            .parse::<f64>()
            .ok()?,
        _ => return None,
    };

    Some(if negative { -value } else { value })
}

/// Where a urlencoded parameter list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Query,
    FormBody,
}

impl Source {
    fn malformed(self, reason: impl std::fmt::Display) -> Problem {
        match self {
            Self::Query => Problem::bad_request(format!("Malformed query string: {reason}"))
                .with_code(MALFORMED_QUERY),
            Self::FormBody => Problem::bad_request(format!("Malformed form data: {reason}"))
                .with_code(MALFORMED_BODY),
        }
    }
}

fn parse_urlencoded(input: &[u8], source: Source) -> Result<Vec<(String, String)>, Problem> {
    serde_urlencoded::from_bytes(input).map_err(|e| source.malformed(e))
}

/// Flatten a JSON object into name/value pairs.
///
/// Strings pass through unquoted, `null` counts as absent, anything else is
/// rendered as JSON text and validated like any other raw value.
fn parse_json_object(input: &[u8]) -> Result<Vec<(String, String)>, Problem> {
    let object: serde_json::Map<String, Value> = serde_json::from_slice(input).map_err(|e| {
        Problem::bad_request(format!("Malformed JSON body: {e}")).with_code(MALFORMED_BODY)
    })?;

    Ok(object
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((name, s)),
            other => Some((name, other.to_string())),
        })
        .collect())
}

fn body_pairs(content_type: Option<&str>, body: &[u8]) -> Result<Vec<(String, String)>, Problem> {
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let Some(content_type) = content_type else {
        return Err(Problem::unsupported_media_type(
            "Request body requires a Content-Type header",
        ));
    };
    let parsed: mime::Mime = content_type.parse().map_err(|_| {
        Problem::unsupported_media_type(format!("Unparsable Content-Type '{content_type}'"))
    })?;

    let essence = parsed.essence_str();
    if essence == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        parse_urlencoded(body, Source::FormBody)
    } else if essence == mime::APPLICATION_JSON.essence_str() {
        parse_json_object(body)
    } else {
        Err(Problem::unsupported_media_type(format!(
            "Content-Type '{essence}' is not supported; \
             use application/x-www-form-urlencoded or application/json"
        )))
    }
}

async fn extract<S>(req: Request, state: &S) -> Result<CalculateRequest, Problem>
where
    S: Send + Sync,
{
    let mut params = RawParams::default();
    params.offer_pairs(parse_urlencoded(
        req.uri().query().unwrap_or_default().as_bytes(),
        Source::Query,
    )?);

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = Bytes::from_request(req, state)
        .await
        .map_err(|rejection| Problem::from_status(rejection.status(), rejection.body_text()))?;
    params.offer_pairs(body_pairs(content_type.as_deref(), &body)?);

    params.validate().map_err(Problem::invalid_parameters)
}

impl<S> FromRequest<S> for CalculateRequest
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_owned();
        extract(req, state).await.map_err(|problem| {
            debug!(
                path = %path,
                code = %problem.code,
                detail = %problem.detail,
                "rejecting calculate request"
            );
            problem.with_request_context(path)
        })
    }
}
