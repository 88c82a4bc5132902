//! Rate limiting trait for verification code issuance

use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,

    /// How long the client should wait before retrying; zero when allowed
    pub retry_after: Duration,

    /// Policy that produced the decision
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitDecision {
    pub fn allow(limit: u32, window: Duration) -> Self {
        Self {
            allowed: true,
            retry_after: Duration::ZERO,
            limit,
            window,
        }
    }

    pub fn deny(retry_after: Duration, limit: u32, window: Duration) -> Self {
        Self {
            allowed: false,
            retry_after,
            limit,
            window,
        }
    }
}

/// Per-identity admission check for issuance requests
///
/// Called once per issuance attempt. Every call is recorded, allowed or not,
/// and the decision never touches the code cache.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn admit(&self, identity: &str) -> RateLimitDecision;
}
