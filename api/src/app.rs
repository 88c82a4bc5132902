//! Application factory
//!
//! Builds the actix-web application from already-constructed state. All
//! wiring of concrete collaborators happens in `main`.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use tracing_actix_web::TracingLogger;

use otp_core::{CodeCache, RateLimiter, SmsSender};

use crate::handlers::{json_error_handler, not_found};
use crate::middleware::Recovery;
use crate::routes::health::health_check;
use crate::routes::sms::{send_login_code, verify_login_code};
use crate::routes::AppState;
use crate::validation::ValidatorRegistry;

/// Default JSON body limit in bytes
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 4096;

/// Create and configure the application with all dependencies
pub fn create_app<S, C, R>(
    app_state: web::Data<AppState<S, C, R>>,
    validator: web::Data<ValidatorRegistry>,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SmsSender + ?Sized + 'static,
    C: CodeCache + ?Sized + 'static,
    R: RateLimiter + ?Sized + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(validator)
        .app_data(json_config)
        .wrap(Recovery)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/sms")
                .route("/login", web::post().to(send_login_code::<S, C, R>))
                .route("/login/verify", web::post().to(verify_login_code::<S, C, R>)),
        )
        .default_service(web::route().to(not_found))
}
