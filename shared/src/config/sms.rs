//! SMS delivery configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which SMS sender to construct at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Log the message instead of sending it
    #[default]
    Mock,
    /// JSON-over-HTTP SMS gateway
    Http,
}

/// SMS delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    pub provider: SmsProvider,

    /// Gateway endpoint URL (required for `http`)
    pub endpoint: Option<String>,

    /// Gateway credentials
    pub access_key_id: String,
    pub access_key_secret: String,

    /// Signature shown as the message sender
    pub sign_name: String,

    /// Provider-side message template identifier
    pub template_code: String,

    /// Timeout for a single gateway request, in seconds
    pub request_timeout_seconds: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            endpoint: None,
            access_key_id: String::new(),
            access_key_secret: String::new(),
            sign_name: String::new(),
            template_code: String::new(),
            request_timeout_seconds: 10,
        }
    }
}

impl SmsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

// Keep credentials out of logs.
impl std::fmt::Display for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "provider={:?} endpoint={} sign_name={} template_code={}",
            self.provider,
            self.endpoint.as_deref().unwrap_or("-"),
            self.sign_name,
            self.template_code
        )
    }
}
