//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    CodeCache, OtpService, OtpServiceConfig, RateLimitDecision, RateLimiter, SmsSender,
};
