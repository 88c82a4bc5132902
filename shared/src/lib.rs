//! Shared utilities and common types for the SMS OTP server
//!
//! This crate provides common functionality used across all server modules:
//! - The canonical error taxonomy (`ErrorKind`) and its transport mapping
//! - Response envelope and structured error detail types
//! - Configuration types and layered loading
//! - Utility functions (phone validation, masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, LoggingConfig, OtpConfig, RateLimitConfig, ServerConfig, SmsConfig,
    SmsProvider,
};
pub use errors::{describe, describe_code, CodeDetail, ErrorKind};
pub use types::{ErrorDetail, Language, ResponseEnvelope};
pub use utils::phone;
