//! # SMS OTP Core
//!
//! Core business logic for one-time verification codes sent by SMS.
//! This crate contains the domain errors, the collaborator traits the
//! service depends on (SMS delivery, code cache, rate limiter) and the
//! issuance / verification state machine.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
