//! Domain-specific error types and error handling.
//!
//! These errors never reach a client directly: the HTTP layer maps each
//! variant onto an `ErrorKind` plus structured details, and keeps the error
//! itself only for logging.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by an SMS sender
///
/// The core treats delivery as opaque; the variants exist so senders can
/// give a useful log message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("provider rejected the message: {0}")]
    Rejected(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Issuance denied by the rate limiter; client-actionable
    #[error("{message}")]
    RateLimitExceeded {
        message: String,
        retry_after: Duration,
    },

    /// The SMS sender failed; no code was cached
    #[error("failed to deliver verification code: {0}")]
    Delivery(#[from] SmsError),

    /// The SMS sender did not answer in time; no code was cached
    #[error("verification code delivery timed out after {timeout:?}")]
    DeliveryTimeout { timeout: Duration },
}

pub type DomainResult<T> = Result<T, DomainError>;
