use actix_web::{web, HttpServer};
use anyhow::Context;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use otp_api::app::create_app;
use otp_api::routes::AppState;
use otp_api::validation::ValidatorRegistry;
use otp_core::{OtpService, OtpServiceConfig, SmsSender};
use otp_infra::{create_sms_sender, InMemoryCodeCache, SlidingWindowRateLimiter};
use otp_shared::config::ConfigSource;
use otp_shared::AppConfig;

const DEFAULT_CONFIG_TEMPLATE: &str = "config/template.toml";

type ServiceState = AppState<dyn SmsSender, InMemoryCodeCache, SlidingWindowRateLimiter>;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let template =
        env::var("CONFIG_TEMPLATE").unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string());
    let mut sources = vec![ConfigSource::required(template)];
    if let Ok(secret) = env::var("CONFIG_SECRET") {
        sources.push(ConfigSource::optional(secret));
    }
    let config = AppConfig::load(&sources).context("failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting SMS OTP API server");
    info!(sms = %config.sms, "SMS configuration");

    let sms_sender: Arc<dyn SmsSender> = Arc::from(
        create_sms_sender(&config.sms).context("failed to create SMS sender")?,
    );

    let code_cache = Arc::new(InMemoryCodeCache::new());
    let rate_limiter = Arc::new(SlidingWindowRateLimiter::from_config(&config.rate_limit));

    let sweep_interval = config.otp.sweep_interval();
    let cache_sweeper = code_cache.spawn_sweeper(sweep_interval);
    let limiter_sweeper = rate_limiter.spawn_sweeper(sweep_interval);

    let otp_service = Arc::new(OtpService::new(
        sms_sender,
        code_cache,
        rate_limiter,
        OtpServiceConfig::from(&config.otp),
    ));

    let app_state: web::Data<ServiceState> = web::Data::new(AppState::new(otp_service));
    let validator = web::Data::new(ValidatorRegistry::new());
    let max_payload_size = config.server.max_payload_size;

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), validator.clone(), max_payload_size)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    for address in &config.server.addresses {
        info!(address = %address, "Binding HTTP listener");
        server = server
            .bind(address.as_str())
            .with_context(|| format!("failed to bind {}", address))?;
    }

    server.run().await.context("HTTP server error")?;

    cache_sweeper.abort();
    limiter_sweeper.abort();
    info!("SMS OTP API server stopped");
    Ok(())
}
