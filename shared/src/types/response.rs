//! Response envelope and structured error details
//!
//! Every response, success or failure, is a [`ResponseEnvelope`]. Failures
//! carry zero or more [`ErrorDetail`] values that tell a machine client what
//! went wrong and whether retrying makes sense.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

use crate::errors::{describe, ErrorKind};
use crate::types::language::Language;

/// Structured detail attached to a failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum ErrorDetail {
    /// A single request field failed validation
    #[serde(rename = "BadRequest.FieldViolation")]
    FieldViolation { field: String, description: String },

    /// A quota check failed
    #[serde(rename = "QuotaFailure.Violation")]
    QuotaViolation { description: String },

    /// How long the client should wait before retrying
    #[serde(rename = "RetryInfo")]
    RetryInfo {
        #[serde(
            serialize_with = "serialize_duration",
            deserialize_with = "deserialize_duration"
        )]
        retry_delay: Duration,
    },
}

impl ErrorDetail {
    pub fn field_violation(field: impl Into<String>, description: impl Into<String>) -> Self {
        ErrorDetail::FieldViolation {
            field: field.into(),
            description: description.into(),
        }
    }

    pub fn quota_violation(description: impl Into<String>) -> Self {
        ErrorDetail::QuotaViolation {
            description: description.into(),
        }
    }

    pub fn retry_info(retry_delay: Duration) -> Self {
        ErrorDetail::RetryInfo { retry_delay }
    }
}

/// Uniform payload returned for every request
///
/// Serialized as `{code, status, message, data?, error?}`. `data` is only
/// meaningful for `OK`; `error` (the details) only for failures. The causal
/// error is kept for logging and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope<T = serde_json::Value> {
    pub code: ErrorKind,
    pub status: String,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(rename = "error", default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,

    #[serde(skip)]
    pub cause: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    /// Successful response carrying an optional payload
    pub fn success(data: Option<T>) -> Self {
        let detail = describe(ErrorKind::Ok);
        Self {
            code: ErrorKind::Ok,
            status: detail.status.to_string(),
            message: detail.message.to_string(),
            data,
            details: Vec::new(),
            cause: None,
        }
    }

    /// Failed response of the given kind
    ///
    /// `cause` is retained for logging only. Building a failure with
    /// `ErrorKind::Ok` is a programming error and yields `INTERNAL`.
    pub fn failure(
        kind: ErrorKind,
        cause: Option<String>,
        details: impl IntoIterator<Item = ErrorDetail>,
    ) -> Self {
        let (kind, cause) = if kind.is_ok() {
            (
                ErrorKind::Internal,
                Some("failure response built with OK kind".to_string()),
            )
        } else {
            (kind, cause)
        };

        let detail = describe(kind);
        Self {
            code: kind,
            status: detail.status.to_string(),
            message: detail.message.to_string(),
            data: None,
            details: details.into_iter().collect(),
            cause,
        }
    }

    /// Replace the default message with the one for `language`
    pub fn localized(mut self, language: Language) -> Self {
        let detail = describe(self.code);
        self.message = match language {
            Language::Chinese => detail.message.to_string(),
            Language::English => detail.message_en.to_string(),
        };
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.code
    }

    pub fn is_success(&self) -> bool {
        self.code.is_ok()
    }

    pub fn http_status(&self) -> u16 {
        describe(self.code).http_status
    }

    pub fn log_level(&self) -> tracing::Level {
        describe(self.code).log_level
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = duration.subsec_millis();
    let text = if millis == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}.{:03}s", duration.as_secs(), millis)
    };
    serializer.serialize_str(&text)
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    let seconds = text
        .strip_suffix('s')
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s >= 0.0)
        .ok_or_else(|| de::Error::custom(format!("invalid duration: {}", text)))?;
    Ok(Duration::from_secs_f64(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope: ResponseEnvelope = ResponseEnvelope::success(None);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"code": 0, "status": "OK", "message": "成功"}));
        assert_eq!(envelope.http_status(), 200);
    }

    #[test]
    fn test_success_with_data() {
        let envelope = ResponseEnvelope::success(Some(json!({"verified": true})));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"]["verified"], json!(true));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_keeps_detail_order_and_hides_cause() {
        let envelope: ResponseEnvelope = ResponseEnvelope::failure(
            ErrorKind::ResourceExhausted,
            Some("limiter denied".to_string()),
            vec![
                ErrorDetail::quota_violation("too many requests"),
                ErrorDetail::retry_info(Duration::from_secs(300)),
            ],
        );

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["code"], json!(9));
        assert_eq!(value["status"], json!("RESOURCE_EXHAUSTED"));
        assert_eq!(
            value["error"],
            json!([
                {"@type": "QuotaFailure.Violation", "description": "too many requests"},
                {"@type": "RetryInfo", "retry_delay": "300s"}
            ])
        );
        assert!(!value.to_string().contains("limiter denied"));
        assert_eq!(envelope.cause.as_deref(), Some("limiter denied"));
        assert_eq!(envelope.http_status(), 429);
    }

    #[test]
    fn test_failure_with_ok_kind_becomes_internal() {
        let envelope: ResponseEnvelope = ResponseEnvelope::failure(ErrorKind::Ok, None, vec![]);
        assert_eq!(envelope.kind(), ErrorKind::Internal);
        assert!(envelope.cause.is_some());
    }

    #[test]
    fn test_localized_message() {
        let envelope: ResponseEnvelope =
            ResponseEnvelope::failure(ErrorKind::InvalidArgument, None, vec![])
                .localized(Language::English);
        assert_eq!(envelope.message, "The client specified an invalid argument");
    }

    #[test]
    fn test_retry_delay_with_fraction() {
        let detail = ErrorDetail::retry_info(Duration::from_millis(1500));
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["retry_delay"], json!("1.500s"));

        let parsed: ErrorDetail = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, detail);
    }

    #[test]
    fn test_field_violation_shape() {
        let detail = ErrorDetail::field_violation("cn_cell_phone_number", "invalid");
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            value,
            json!({
                "@type": "BadRequest.FieldViolation",
                "field": "cn_cell_phone_number",
                "description": "invalid"
            })
        );
    }
}
