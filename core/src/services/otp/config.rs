//! Configuration for the verification code service

use std::time::Duration;

use otp_shared::config::OtpConfig;

use crate::domain::entities::verification_code::{CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES};

/// Configuration for the verification code service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of digits in a generated code
    pub code_length: usize,
    /// Minutes a code stays valid; the same value is shown to the user
    pub expire_minutes: u32,
    /// Upper bound for one delivery attempt
    pub delivery_timeout: Duration,
}

impl OtpServiceConfig {
    /// Cache lifetime of an issued code
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.expire_minutes) * 60)
    }
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            expire_minutes: DEFAULT_EXPIRATION_MINUTES,
            delivery_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: usize::from(config.code_length),
            expire_minutes: config.ttl_minutes,
            delivery_timeout: config.delivery_timeout(),
        }
    }
}
