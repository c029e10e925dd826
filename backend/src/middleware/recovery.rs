//! Panic recovery middleware.
//!
//! A handler that panics would otherwise tear down the connection without a
//! response. [`CatchPanic`] turns the panic into a `500 INTERNAL_ERROR` JSON
//! body and logs the panic message, so the worker keeps serving.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpRequest, ResponseError};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::Error as ApiError;

/// Middleware converting handler panics into internal-error responses.
///
/// Wrap it inside [`RequestTracing`](super::RequestTracing) so the response
/// still carries the request id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::middleware::{CatchPanic, RequestTracing};
///
/// let app = App::new().wrap(CatchPanic).wrap(RequestTracing);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CatchPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicMiddleware { service }))
    }
}

/// Service wrapper produced by [`CatchPanic`].
pub struct CatchPanicMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let http_req = req.request().clone();
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => return Box::pin(ready(Ok(recovered(http_req, &*payload)))),
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result.map(ServiceResponse::map_into_left_body),
                Err(payload) => Ok(recovered(http_req, &*payload)),
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn recovered<B>(req: HttpRequest, payload: &(dyn Any + Send)) -> ServiceResponse<EitherBody<B>> {
    error!(
        panic = panic_message(payload),
        method = %req.method(),
        path = req.path(),
        "handler panicked"
    );
    let response = ApiError::internal("Internal server error").error_response();
    ServiceResponse::new(req, response).map_into_right_body()
}
