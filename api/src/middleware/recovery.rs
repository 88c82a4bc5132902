//! Panic recovery middleware.
//!
//! A panic inside a handler unwinds out of the handler future. This
//! middleware catches it and answers with an `INTERNAL` envelope instead of
//! dropping the connection, so clients always receive a well-formed
//! response. The panic message is logged as the cause and never sent.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::{FutureExt, LocalBoxFuture};
use std::{
    any::Any,
    future::{ready, Ready},
    panic::AssertUnwindSafe,
    rc::Rc,
    task::{Context, Poll},
};

use otp_shared::{ErrorKind, ResponseEnvelope};

use crate::handlers::respond;

/// Panic recovery middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoveryMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Panic recovery middleware service
pub struct RecoveryMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RecoveryMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let http_req = req.request().clone();

        Box::pin(async move {
            // The inner call runs inside the guarded future so a panic while
            // building the handler future is caught as well.
            let guarded = AssertUnwindSafe(async move { service.call(req).await });

            match guarded.catch_unwind().await {
                Ok(result) => result.map(ServiceResponse::map_into_left_body),
                Err(payload) => {
                    let envelope: ResponseEnvelope = ResponseEnvelope::failure(
                        ErrorKind::Internal,
                        Some(format!("handler panicked: {}", panic_message(payload.as_ref()))),
                        [],
                    );
                    let response = respond(&http_req, envelope);
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
