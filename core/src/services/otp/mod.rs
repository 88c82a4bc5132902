//! One-time verification code service
//!
//! This module provides the verification code workflow:
//! - Admission check against the per-identity rate limiter
//! - Code generation and SMS delivery with a bounded timeout
//! - Caching the delivered code for its lifetime
//! - Verifying a candidate code against the cache

mod config;
mod rate_limiter;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use service::OtpService;
pub use traits::{CodeCache, SmsSender};
