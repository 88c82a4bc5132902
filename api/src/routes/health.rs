use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use otp_shared::ResponseEnvelope;

use crate::handlers::respond;

/// Health check endpoint handler
pub async fn health_check(req: HttpRequest) -> HttpResponse {
    let data = json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    respond(&req, ResponseEnvelope::success(Some(data)))
}
