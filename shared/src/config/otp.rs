//! Verification code configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Verification code issuance settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Number of decimal digits in a generated code; must be [`OtpConfig::CODE_LENGTH`]
    pub code_length: u8,

    /// Minutes a code stays valid; also the expiry shown to the user
    pub ttl_minutes: u32,

    /// Upper bound for a single delivery attempt, in seconds
    pub delivery_timeout_seconds: u64,

    /// Interval of the background sweep that evicts expired state, in seconds
    pub sweep_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: Self::CODE_LENGTH,
            ttl_minutes: 5,
            delivery_timeout_seconds: 10,
            sweep_interval_seconds: 60,
        }
    }
}

impl OtpConfig {
    /// Width clients are told to enter and the verify endpoint accepts
    pub const CODE_LENGTH: u8 = 6;

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_minutes) * 60)
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}
