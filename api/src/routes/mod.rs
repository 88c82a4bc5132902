//! Route handlers
//!
//! - `sms` - login verification code issuance and verification
//! - `health` - liveness check

pub mod health;
pub mod sms;

use std::sync::Arc;

use otp_core::{CodeCache, OtpService, RateLimiter, SmsSender};

/// Application state that holds shared services
pub struct AppState<S, C, R>
where
    S: SmsSender + ?Sized,
    C: CodeCache + ?Sized,
    R: RateLimiter + ?Sized,
{
    pub otp_service: Arc<OtpService<S, C, R>>,
}

impl<S, C, R> AppState<S, C, R>
where
    S: SmsSender + ?Sized,
    C: CodeCache + ?Sized,
    R: RateLimiter + ?Sized,
{
    pub fn new(otp_service: Arc<OtpService<S, C, R>>) -> Self {
        Self { otp_service }
    }
}
