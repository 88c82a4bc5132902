//! HTTP SMS Gateway Sender
//!
//! Sends verification codes through a JSON-over-HTTP SMS gateway. The
//! request carries the signature name, template identifier and template
//! parameters; credentials go in a basic authorization header.
//!
//! A non-2xx status, or a 2xx body whose `code` is not `OK`, counts as a
//! rejection. Connection failures and client timeouts are transport errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use otp_core::{SmsError, SmsSender};
use otp_shared::utils::phone::mask_phone_number;
use otp_shared::SmsConfig;

use crate::InfrastructureError;

/// Request body sent to the gateway
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    phone_numbers: &'a str,
    sign_name: &'a str,
    template_code: &'a str,
    template_param: TemplateParam<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParam<'a> {
    code: &'a str,
    expire: u32,
}

/// Gateway answer; both fields are optional so plain `200 OK` bodies pass
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SendResponse {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

/// SMS sender backed by an HTTP gateway
pub struct HttpSmsGateway {
    client: Client,
    endpoint: String,
    access_key_id: String,
    access_key_secret: String,
    sign_name: String,
    template_code: String,
}

impl HttpSmsGateway {
    /// Build a gateway sender from configuration
    ///
    /// # Errors
    ///
    /// * `Config` - no endpoint configured
    /// * `Http` - the HTTP client could not be built
    pub fn new(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| {
                InfrastructureError::Config("sms.endpoint is required for the http provider".into())
            })?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
            sign_name: config.sign_name.clone(),
            template_code: config.template_code.clone(),
        })
    }
}

#[async_trait]
impl SmsSender for HttpSmsGateway {
    async fn send(&self, phone: &str, code: &str, expire_minutes: u32) -> Result<(), SmsError> {
        let masked_phone = mask_phone_number(phone);
        let body = SendRequest {
            phone_numbers: phone,
            sign_name: &self.sign_name,
            template_code: &self.template_code,
            template_param: TemplateParam {
                code,
                expire: expire_minutes,
            },
        };

        debug!(phone = %masked_phone, endpoint = %self.endpoint, "Sending SMS via gateway");

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.access_key_id, Some(&self.access_key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(
                phone = %masked_phone,
                status = status.as_u16(),
                "SMS gateway returned an error status"
            );
            return Err(SmsError::Rejected(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let parsed: SendResponse = serde_json::from_str(&text).unwrap_or_default();
        if let Some(code) = parsed.code.as_deref() {
            if !code.eq_ignore_ascii_case("OK") {
                let reason = parsed.message.unwrap_or_default();
                warn!(phone = %masked_phone, gateway_code = code, "SMS gateway rejected the message");
                return Err(SmsError::Rejected(format!("{}: {}", code, reason)));
            }
        }

        info!(
            target: "sms_service",
            provider = "http",
            phone = %masked_phone,
            request_id = parsed.request_id.as_deref().unwrap_or("-"),
            "SMS sent successfully"
        );

        Ok(())
    }

    fn provider_name(&self) -> &str {
        "http"
    }
}
