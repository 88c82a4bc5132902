//! Rendering of response envelopes
//!
//! Every handler result, success or failure, leaves the service through
//! [`respond`]. It localizes the message, logs the outcome once at the
//! severity the error kind carries, and sets the HTTP status from the kind.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::{header, StatusCode};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::Level;

use otp_core::DomainError;
use otp_shared::{ErrorDetail, ErrorKind, Language, ResponseEnvelope};

/// Extract language preference from request
pub fn extract_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            Level::TRACE => tracing::trace!($($arg)+),
            _ => tracing::info!($($arg)+),
        }
    };
}

/// Render `envelope` as the HTTP response for `req`
pub fn respond<T: Serialize>(req: &HttpRequest, envelope: ResponseEnvelope<T>) -> HttpResponse {
    let envelope = envelope.localized(extract_language(req));
    let status = StatusCode::from_u16(envelope.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let cause = envelope.cause.as_deref().unwrap_or("-");

    log_at!(
        envelope.log_level(),
        method = %req.method(),
        path = req.path(),
        http_status = status.as_u16(),
        code = envelope.code.code(),
        status = %envelope.status,
        details = envelope.details.len(),
        cause,
        "{}",
        envelope.message
    );

    HttpResponse::build(status).json(&envelope)
}

/// Map a domain error to its client-facing envelope
///
/// Rate limiting is reported with quota and retry details; delivery
/// failures collapse to `INTERNAL`, keeping the error only as the
/// logged cause.
pub fn domain_error_envelope(error: &DomainError) -> ResponseEnvelope {
    match error {
        DomainError::RateLimitExceeded {
            message,
            retry_after,
        } => ResponseEnvelope::failure(
            ErrorKind::ResourceExhausted,
            Some(error.to_string()),
            [
                ErrorDetail::quota_violation(message.clone()),
                ErrorDetail::retry_info(*retry_after),
            ],
        ),
        DomainError::Delivery(_) | DomainError::DeliveryTimeout { .. } => {
            ResponseEnvelope::failure(ErrorKind::Internal, Some(error.to_string()), [])
        }
    }
}

/// Turn a JSON body error into an `INVALID_ARGUMENT` envelope
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let envelope: ResponseEnvelope = ResponseEnvelope::failure(
        ErrorKind::InvalidArgument,
        Some(err.to_string()),
        [ErrorDetail::field_violation("body", body_error_description(&err, extract_language(req)))],
    );
    let response = respond(req, envelope);
    InternalError::from_response(err, response).into()
}

fn body_error_description(err: &JsonPayloadError, language: Language) -> String {
    match (err, language) {
        (JsonPayloadError::ContentType, Language::Chinese) => {
            "请求体必须是 application/json".to_string()
        }
        (JsonPayloadError::ContentType, Language::English) => {
            "request body must be application/json".to_string()
        }
        (JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. }, Language::Chinese) => {
            "请求体过大".to_string()
        }
        (JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. }, Language::English) => {
            "request body is too large".to_string()
        }
        (other, Language::Chinese) => format!("请求体不是有效的 JSON: {}", other),
        (other, Language::English) => format!("request body is not valid JSON: {}", other),
    }
}

/// Default handler for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    let envelope: ResponseEnvelope = ResponseEnvelope::failure(
        ErrorKind::NotFound,
        Some(format!("no route for {} {}", req.method(), req.path())),
        [],
    );
    respond(&req, envelope)
}
