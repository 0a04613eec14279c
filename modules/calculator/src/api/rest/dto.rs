//! REST DTOs for the calculator module
//!
//! These types are transport-specific (serde + utoipa for REST/OpenAPI).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use utoipa::openapi::schema::{
    KnownFormat, ObjectBuilder, OneOfBuilder, Schema, SchemaFormat, SchemaType, Type,
};

use crate::domain::CalculationError;

/// Parameters of a calculation request.
///
/// Accepted as query string, form body or JSON body; see
/// [`super::extract`] for the merge rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculateRequest {
    /// First operand
    pub num1: f64,
    /// Second operand
    pub num2: f64,
    /// One of `add`, `subtract`, `multiply`, `divide`
    #[schema(example = "add")]
    pub operation: String,
}

/// Outcome of a calculation.
///
/// Check `error` first: when it is set, `result` is `0` and meaningless.
/// Non-finite results serialize as the strings `"NaN"`, `"Infinity"` and
/// `"-Infinity"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculationResult {
    #[serde(
        serialize_with = "serialize_result",
        deserialize_with = "deserialize_result"
    )]
    #[schema(schema_with = result_schema)]
    pub result: f64,
    pub error: Option<String>,
}

/// Label of a non-finite value, `None` for finite ones.
#[must_use]
fn non_finite_label(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() {
        Some(if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        })
    } else {
        None
    }
}

/// Inverse of [`non_finite_label`].
#[must_use]
fn from_non_finite_label(label: &str) -> Option<f64> {
    match label {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_result<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match non_finite_label(*value) {
        Some(label) => serializer.serialize_str(label),
        None => serializer.serialize_f64(*value),
    }
}

fn deserialize_result<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Label(String),
    }

    match Wire::deserialize(deserializer)? {
        Wire::Number(value) => Ok(value),
        Wire::Label(label) => from_non_finite_label(&label)
            .ok_or_else(|| D::Error::custom(format!("unexpected result '{label}'"))),
    }
}

fn result_schema() -> Schema {
    let number = ObjectBuilder::new()
        .schema_type(SchemaType::Type(Type::Number))
        .format(Some(SchemaFormat::KnownFormat(KnownFormat::Double)))
        .build();
    let non_finite = ObjectBuilder::new()
        .schema_type(SchemaType::Type(Type::String))
        .enum_values(Some(["NaN", "Infinity", "-Infinity"]))
        .build();
    Schema::OneOf(
        OneOfBuilder::new()
            .item(Schema::Object(number))
            .item(Schema::Object(non_finite))
            .build(),
    )
}

impl CalculationResult {
    #[must_use]
    pub const fn ok(result: f64) -> Self {
        Self {
            result,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: &CalculationError) -> Self {
        Self {
            result: 0.0,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<f64, CalculationError>> for CalculationResult {
    fn from(outcome: Result<f64, CalculationError>) -> Self {
        match outcome {
            Ok(result) => Self::ok(result),
            Err(e) => Self::failed(&e),
        }
    }
}

/// Liveness probe payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_owned(),
        }
    }
}
