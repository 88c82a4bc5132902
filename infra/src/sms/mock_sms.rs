//! Mock SMS Sender Implementation
//!
//! Logs verification messages instead of sending them. Used for local
//! development and as a controllable sender in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::{SmsError, SmsSender};
use otp_shared::utils::phone::{is_cn_cell_phone_number, mask_phone_number};

use super::render_verification_message;

/// Mock SMS sender for development and testing
///
/// This implementation:
/// - Rejects numbers that are not mainland China mobile numbers
/// - Logs the rendered message, code included
/// - Remembers the last code sent to each phone
/// - Counts delivered messages
#[derive(Clone, Default)]
pub struct MockSmsSender {
    message_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    last_codes: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of messages delivered
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Last code delivered to `phone`
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.last_codes
            .lock()
            .ok()
            .and_then(|codes| codes.get(phone).cloned())
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send(&self, phone: &str, code: &str, expire_minutes: u32) -> Result<(), SmsError> {
        let masked_phone = mask_phone_number(phone);

        if !is_cn_cell_phone_number(phone) {
            return Err(SmsError::InvalidRecipient(masked_phone));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(phone = %masked_phone, "Mock SMS sender simulating failure");
            return Err(SmsError::Transport(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let message = render_verification_message("", code, expire_minutes);

        if let Ok(mut codes) = self.last_codes.lock() {
            codes.insert(phone.to_string(), code.to_string());
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            count,
            content = %message,
            "SMS sent (mock)"
        );

        Ok(())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
