//! Configuration module with business-specific sub-modules
//!
//! - `otp` - Verification code length, lifetime and delivery timeout
//! - `rate_limit` - Issuance admission window
//! - `server` - HTTP listen addresses and limits
//! - `sms` - SMS provider selection and credentials
//!
//! Configuration is layered: each file overrides the ones before it (a
//! checked-in template followed by an optional secrets file), and
//! `OTP__SECTION__KEY` environment variables override every file.

pub mod otp;
pub mod rate_limit;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use otp::OtpConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProvider};

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
        }
    }
}

/// A configuration file and whether it must exist
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub required: bool,
}

impl ConfigSource {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub otp: OtpConfig,
    pub rate_limit: RateLimitConfig,
    pub sms: SmsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Prefix of environment variable overrides
    pub const ENV_PREFIX: &'static str = "OTP";

    /// Load configuration from `sources` (later sources win) and the environment
    pub fn load(sources: &[ConfigSource]) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        for source in sources {
            builder = builder
                .add_source(::config::File::from(source.path.as_path()).required(source.required));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(Self::ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.otp.code_length != OtpConfig::CODE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "otp.code_length must be {}",
                OtpConfig::CODE_LENGTH
            )));
        }
        if self.otp.ttl_minutes == 0 {
            return Err(ConfigError::Invalid("otp.ttl_minutes must be positive".into()));
        }
        if self.otp.delivery_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "otp.delivery_timeout_seconds must be positive".into(),
            ));
        }
        if self.otp.sweep_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "otp.sweep_interval_seconds must be positive".into(),
            ));
        }
        if self.rate_limit.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.max_attempts must be positive".into(),
            ));
        }
        if self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.window_seconds must be positive".into(),
            ));
        }
        if self.sms.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "sms.request_timeout_seconds must be positive".into(),
            ));
        }
        if self.server.addresses.is_empty() {
            return Err(ConfigError::Invalid(
                "server.addresses must list at least one address".into(),
            ));
        }
        if self.sms.provider == SmsProvider::Http
            && self.sms.endpoint.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "sms.endpoint is required for the http provider".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("otp-config-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.otp.code_length, 6);
        assert_eq!(config.otp.ttl_minutes, 5);
        assert_eq!(config.rate_limit.max_attempts, 10);
        assert_eq!(config.rate_limit.window_seconds, 300);
        assert_eq!(config.sms.provider, SmsProvider::Mock);
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let template = write_temp(
            "template.toml",
            "[otp]\nttl_minutes = 7\n\n[sms]\nsign_name = \"demo\"\n",
        );
        let secret = write_temp(
            "secret.toml",
            "[sms]\naccess_key_id = \"id\"\nsign_name = \"prod\"\n",
        );

        let config = AppConfig::load(&[
            ConfigSource::required(&template),
            ConfigSource::optional(&secret),
        ])
        .unwrap();

        assert_eq!(config.otp.ttl_minutes, 7);
        assert_eq!(config.sms.sign_name, "prod");
        assert_eq!(config.sms.access_key_id, "id");
        assert_eq!(config.rate_limit.max_attempts, 10);

        fs::remove_file(template).ok();
        fs::remove_file(secret).ok();
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let template = write_temp("only.toml", "[rate_limit]\nmax_attempts = 3\n");
        let config = AppConfig::load(&[
            ConfigSource::required(&template),
            ConfigSource::optional("/nonexistent/otp-secret.toml"),
        ])
        .unwrap();
        assert_eq!(config.rate_limit.max_attempts, 3);
        fs::remove_file(template).ok();
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = AppConfig::load(&[ConfigSource::required("/nonexistent/otp-template.toml")]);
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_http_provider_requires_endpoint() {
        let mut config = AppConfig::default();
        config.sms.provider = SmsProvider::Http;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.sms.endpoint = Some("https://sms.example.com/send".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = AppConfig::default();
        config.rate_limit.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.otp.code_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_code_length_other_than_six_rejected() {
        for length in [4, 8] {
            let mut config = AppConfig::default();
            config.otp.code_length = length;
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(ref message)) if message.contains("code_length")),
                "code_length {} was accepted",
                length
            );
        }
    }

    #[test]
    fn test_code_length_override_fails_load() {
        let template = write_temp("length.toml", "[otp]\ncode_length = 8\n");
        let result = AppConfig::load(&[ConfigSource::required(&template)]);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        fs::remove_file(template).ok();
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = AppConfig::default();
        config.otp.delivery_timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(ref message)) if message.contains("delivery_timeout_seconds")));

        let mut config = AppConfig::default();
        config.sms.request_timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(ref message)) if message.contains("request_timeout_seconds")));
    }
}
