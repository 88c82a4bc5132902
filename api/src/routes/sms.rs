//! Login verification code endpoints

use actix_web::{web, HttpRequest, HttpResponse};

use otp_core::{CodeCache, RateLimiter, SmsSender};
use otp_shared::{ErrorKind, ResponseEnvelope};

use crate::dto::{SendCodeRequest, VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::{domain_error_envelope, extract_language, respond};
use crate::routes::AppState;
use crate::validation::ValidatorRegistry;

/// Handler for POST /sms/login
///
/// Sends a login verification code to a mainland China mobile number.
///
/// # Request Body
///
/// ```json
/// { "cn_cell_phone_number": "13812345678" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "code": 0, "status": "OK", "message": "成功" }
/// ```
///
/// ## Errors
/// - 400 `INVALID_ARGUMENT` with a field violation per invalid field
/// - 429 `RESOURCE_EXHAUSTED` with quota and retry details
/// - 500 `INTERNAL` when delivery fails
pub async fn send_login_code<S, C, R>(
    req: HttpRequest,
    state: web::Data<AppState<S, C, R>>,
    validator: web::Data<ValidatorRegistry>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse
where
    S: SmsSender + ?Sized + 'static,
    C: CodeCache + ?Sized + 'static,
    R: RateLimiter + ?Sized + 'static,
{
    let request = request.into_inner();

    if let Err(violations) = validator.validate(&request, extract_language(&req)) {
        let envelope: ResponseEnvelope = ResponseEnvelope::failure(
            ErrorKind::InvalidArgument,
            Some("send login code request failed validation".to_string()),
            violations,
        );
        return respond(&req, envelope);
    }

    let phone = request.cn_cell_phone_number.unwrap_or_default();

    match state.otp_service.issue(&phone).await {
        Ok(()) => respond(&req, ResponseEnvelope::<()>::success(None)),
        Err(error) => respond(&req, domain_error_envelope(&error)),
    }
}

/// Handler for POST /sms/login/verify
///
/// Checks a code previously sent to the number. A missing, expired or
/// mismatched code is a normal outcome reported as `verified: false`.
///
/// # Request Body
///
/// ```json
/// { "cn_cell_phone_number": "13812345678", "code": "123456" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "code": 0, "status": "OK", "message": "成功", "data": { "verified": true } }
/// ```
pub async fn verify_login_code<S, C, R>(
    req: HttpRequest,
    state: web::Data<AppState<S, C, R>>,
    validator: web::Data<ValidatorRegistry>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse
where
    S: SmsSender + ?Sized + 'static,
    C: CodeCache + ?Sized + 'static,
    R: RateLimiter + ?Sized + 'static,
{
    let request = request.into_inner();

    if let Err(violations) = validator.validate(&request, extract_language(&req)) {
        let envelope: ResponseEnvelope = ResponseEnvelope::failure(
            ErrorKind::InvalidArgument,
            Some("verify login code request failed validation".to_string()),
            violations,
        );
        return respond(&req, envelope);
    }

    let phone = request.cn_cell_phone_number.unwrap_or_default();
    let code = request.code.unwrap_or_default();

    let verified = state.otp_service.verify(&phone, &code).await;
    respond(
        &req,
        ResponseEnvelope::success(Some(VerifyCodeResponse { verified })),
    )
}
