//! Traits for SMS delivery and code cache integration

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::SmsError;

/// Out-of-band delivery of a verification code
///
/// Implementations only render the code and expiry into a message and send
/// it. Caching and verification never happen inside a sender.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send `code` to `phone`; `expire_minutes` is the validity shown to the user
    async fn send(&self, phone: &str, code: &str, expire_minutes: u32) -> Result<(), SmsError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}

/// Time-bounded store of pending codes keyed by identity
#[async_trait]
pub trait CodeCache: Send + Sync {
    /// Insert or unconditionally replace the code for `identity`
    async fn put(&self, identity: &str, code: &str, ttl: Duration);

    /// The code for `identity`, unless absent or expired
    async fn get(&self, identity: &str) -> Option<String>;
}
