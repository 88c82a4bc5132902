//! SMS Module
//!
//! Implementations of the core `SmsSender` capability:
//!
//! - **Mock**: logs the message instead of sending it (development, tests)
//! - **HTTP gateway**: JSON request to a configurable SMS gateway
//!
//! Phone numbers are masked in every log line.

pub mod http_gateway;
pub mod mock_sms;

pub use http_gateway::HttpSmsGateway;
pub use mock_sms::MockSmsSender;

use otp_core::SmsSender;
use otp_shared::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

/// Render the verification message text
pub fn render_verification_message(sign_name: &str, code: &str, expire_minutes: u32) -> String {
    let body = format!(
        "您的登录验证码为 {}，{} 分钟内有效，请勿泄露给他人。",
        code, expire_minutes
    );
    if sign_name.is_empty() {
        body
    } else {
        format!("【{}】{}", sign_name, body)
    }
}

/// Create the SMS sender selected by configuration
///
/// Unlike a silent fallback, a misconfigured gateway is a startup error.
pub fn create_sms_sender(config: &SmsConfig) -> Result<Box<dyn SmsSender>, InfrastructureError> {
    match config.provider {
        SmsProvider::Mock => {
            tracing::warn!("Using mock SMS sender; verification codes are only logged");
            Ok(Box::new(MockSmsSender::new()))
        }
        SmsProvider::Http => {
            let gateway = HttpSmsGateway::new(config)?;
            tracing::info!(config = %config, "Using HTTP SMS gateway");
            Ok(Box::new(gateway))
        }
    }
}
