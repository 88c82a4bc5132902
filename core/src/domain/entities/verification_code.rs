//! Verification code entity for SMS-based login.

use rand::{rngs::OsRng, Rng};
use std::time::Duration;
use tokio::time::Instant;

/// Length of the verification code
pub const CODE_LENGTH: usize = otp_shared::OtpConfig::CODE_LENGTH as usize;

/// Default expiration time for verification codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 5;

/// A pending verification code, owned by the code cache
///
/// At most one live entry exists per identity; a new issuance replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEntry {
    /// Normalized phone number the code was sent to
    pub identity: String,

    /// Fixed-width decimal code
    pub code: String,

    pub expires_at: Instant,
}

impl VerificationEntry {
    /// Create an entry that expires `ttl` from now
    pub fn new(identity: impl Into<String>, code: impl Into<String>, ttl: Duration) -> Self {
        Self {
            identity: identity.into(),
            code: code.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Whether the entry is expired at `now`
    ///
    /// An entry whose expiry instant has been reached counts as expired.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Generate a code of `length` decimal digits
///
/// Each digit is drawn uniformly from `0-9` using the OS-provided CSPRNG.
pub fn generate_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
