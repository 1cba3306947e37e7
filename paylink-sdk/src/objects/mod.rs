//! Request and response bodies for the paylink HTTP API.
//!
//! All responses are returned with HTTP 200; the string `status` field
//! (`"true"` / `"false"`) is the sole success indicator. Failure bodies
//! always have the shape `{"status": "false", "error": "..."}`.

pub mod check_status;
pub mod create_link;

pub use check_status::{CheckStatusRequest, CheckStatusResponse};
pub use create_link::{CreateLinkRequest, CreateLinkResponse};

use serde::{Deserialize, Serialize};

/// Payment status as it appears on the wire.
///
/// This is the serde version. For database operations, see
/// `paylink_core::entities::PaymentStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    /// Wire rendering, also used as the signing text for `status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// The body returned for every logical failure, with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    /// Always `"false"`.
    pub status: String,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "false".to_string(),
            error: error.into(),
        }
    }
}

/// Render a decimal for signing: minimal text, no trailing zeros.
///
/// The legacy system signed numbers through float-to-string conversion,
/// so `10.00` participates in the canonical string as `"10"`.
pub fn decimal_text(value: &rust_decimal::Decimal) -> String {
    value.normalize().to_string()
}

/// Serde adapter for decimal fields carried as JSON numbers.
///
/// Serialization emits the same minimal rendering [`decimal_text`] signs
/// over (whole values as integers, fractional values as floats), so the
/// wire text and the canonical signing string never disagree.
pub mod decimal_number {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = value.normalize();
        if normalized.scale() == 0 {
            if let Some(int) = normalized.to_i64() {
                return serializer.serialize_i64(int);
            }
        }
        match normalized.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => Err(serde::ser::Error::custom("decimal out of f64 range")),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let float = f64::deserialize(deserializer)?;
        Decimal::from_f64_retain(float)
            .ok_or_else(|| serde::de::Error::custom("number is not a representable decimal"))
    }
}

/// `Option` variant of [`decimal_number`].
pub mod decimal_number_option {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(decimal) => super::decimal_number::serialize(decimal, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        let float = Option::<f64>::deserialize(deserializer)?;
        float
            .map(|f| {
                Decimal::from_f64_retain(f)
                    .ok_or_else(|| serde::de::Error::custom("number is not a representable decimal"))
            })
            .transpose()
    }
}
