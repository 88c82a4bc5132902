//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the verification code
//! service depends on.
//!
//! ## Architecture
//!
//! - **Cache**: in-process, time-bounded code cache with a background sweeper
//! - **Rate limit**: per-identity sliding window admission check
//! - **SMS**: mock sender for development and an HTTP gateway sender

// Re-export core types for convenience
pub use otp_core::errors::*;

/// Cache module - in-memory verification code storage
pub mod cache;

/// Rate limit module - issuance admission policy
pub mod rate_limit;

/// SMS module - verification code delivery
pub mod sms;

pub use cache::InMemoryCodeCache;
pub use rate_limit::SlidingWindowRateLimiter;
pub use sms::{create_sms_sender, HttpSmsGateway, MockSmsSender};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
