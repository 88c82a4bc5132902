//! Rate limiting configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Issuance rate limit per identity
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Max issuance attempts per identity inside the window
    pub max_attempts: u32,

    /// Trailing window length in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            window_seconds: 300, // 5 minutes
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}
