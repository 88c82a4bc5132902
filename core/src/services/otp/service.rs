//! Verification code service implementation

use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use std::time::Duration;

use otp_shared::utils::phone::mask_phone_number;

use crate::domain::entities::verification_code::generate_code;
use crate::errors::{DomainError, DomainResult};

use super::config::OtpServiceConfig;
use super::rate_limiter::RateLimiter;
use super::traits::{CodeCache, SmsSender};

/// Issues and verifies one-time codes for an identity (a normalized phone number)
///
/// Per identity the service is either idle (no live code) or pending (a live
/// code in the cache). A successful issuance moves to pending and replaces any
/// previous code; expiry moves back to idle. Verification never changes state.
pub struct OtpService<S, C, R>
where
    S: SmsSender + ?Sized,
    C: CodeCache + ?Sized,
    R: RateLimiter + ?Sized,
{
    sms_sender: Arc<S>,
    code_cache: Arc<C>,
    rate_limiter: Arc<R>,
    config: OtpServiceConfig,
}

impl<S, C, R> OtpService<S, C, R>
where
    S: SmsSender + ?Sized,
    C: CodeCache + ?Sized,
    R: RateLimiter + ?Sized,
{
    pub fn new(
        sms_sender: Arc<S>,
        code_cache: Arc<C>,
        rate_limiter: Arc<R>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            sms_sender,
            code_cache,
            rate_limiter,
            config,
        }
    }

    /// Issue a new code to `identity`
    ///
    /// 1. Ask the rate limiter for admission
    /// 2. Generate a code
    /// 3. Deliver it, bounded by the delivery timeout
    /// 4. Cache it, only after delivery succeeded
    ///
    /// # Errors
    ///
    /// * `RateLimitExceeded` - admission denied; nothing generated or sent
    /// * `Delivery` / `DeliveryTimeout` - the sender failed; the cache is untouched
    pub async fn issue(&self, identity: &str) -> DomainResult<()> {
        let masked = mask_phone_number(identity);

        let decision = self.rate_limiter.admit(identity).await;
        if !decision.allowed {
            tracing::warn!(
                phone = %masked,
                limit = decision.limit,
                window_seconds = decision.window.as_secs(),
                retry_after_ms = decision.retry_after.as_millis() as u64,
                event = "rate_limit_exceeded",
                "Verification code issuance denied by rate limiter"
            );
            return Err(DomainError::RateLimitExceeded {
                message: rate_limit_message(decision.limit, decision.window),
                retry_after: decision.retry_after,
            });
        }

        let code = generate_code(self.config.code_length);

        let delivery = tokio::time::timeout(
            self.config.delivery_timeout,
            self.sms_sender
                .send(identity, &code, self.config.expire_minutes),
        )
        .await;

        match delivery {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(
                    phone = %masked,
                    provider = self.sms_sender.provider_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
                return Err(DomainError::Delivery(e));
            }
            Err(_) => {
                tracing::error!(
                    phone = %masked,
                    provider = self.sms_sender.provider_name(),
                    timeout_ms = self.config.delivery_timeout.as_millis() as u64,
                    event = "otp_delivery_timeout",
                    "Verification code delivery timed out"
                );
                return Err(DomainError::DeliveryTimeout {
                    timeout: self.config.delivery_timeout,
                });
            }
        }

        self.code_cache
            .put(identity, &code, self.config.ttl())
            .await;

        tracing::info!(
            phone = %masked,
            provider = self.sms_sender.provider_name(),
            expire_minutes = self.config.expire_minutes,
            event = "otp_generated",
            "Verification code issued"
        );

        Ok(())
    }

    /// Check `candidate` against the live code for `identity`
    ///
    /// Absent, expired or mismatched codes are all `false`. A match does not
    /// consume the code; it stays valid until it expires or is replaced.
    pub async fn verify(&self, identity: &str, candidate: &str) -> bool {
        let verified = match self.code_cache.get(identity).await {
            Some(stored) => constant_time_eq(stored.as_bytes(), candidate.as_bytes()),
            None => false,
        };

        tracing::debug!(
            phone = %mask_phone_number(identity),
            verified,
            event = "otp_verified",
            "Verification code checked"
        );

        verified
    }
}

/// Client-facing description of the issuance quota
fn rate_limit_message(limit: u32, window: Duration) -> String {
    let seconds = window.as_secs();
    let span = if seconds >= 60 && seconds % 60 == 0 {
        format!("{} 分钟", seconds / 60)
    } else {
        format!("{} 秒", seconds)
    };
    format!("登录短信验证码发送频率超限，{}内最多发送 {} 次", span, limit)
}
