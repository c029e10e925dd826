//! Request-id middleware with per-request logging.
//!
//! Each incoming request carries a [`RequestId`] in task-local storage. A
//! well-formed `X-Request-Id` header from the caller is reused; otherwise a
//! UUID v4 is generated. The id is echoed on the response and recorded on
//! the request's `tracing` span.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`RequestId::scope`] when moving work onto another task so the id
//! follows it.

use std::fmt;
use std::future::Future;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

/// Header carrying the request identifier in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

task_local! {
    static REQUEST_ID: RequestId;
}

/// Per-request identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use user_service::middleware::RequestId;
///
/// async fn handler() {
///     if let Some(id) = RequestId::current() {
///         println!("request id: {id}");
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a caller-supplied id when it is non-blank, at most 128
    /// characters long and made of visible ASCII.
    fn from_header(value: &HeaderValue) -> Option<Self> {
        let raw = value.to_str().ok()?.trim();
        let acceptable = !raw.is_empty()
            && raw.len() <= MAX_REQUEST_ID_LEN
            && raw.bytes().all(|byte| byte.is_ascii_graphic());
        acceptable.then(|| Self(raw.to_owned()))
    }

    fn for_request(req: &ServiceRequest) -> Self {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(Self::from_header)
            .unwrap_or_else(Self::generate)
    }

    /// Returns the current request identifier if one is in scope.
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(Clone::clone).ok()
    }

    /// Execute the provided future with the supplied request id in scope.
    ///
    /// # Examples
    /// ```
    /// use user_service::middleware::RequestId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = RequestId::from("req-42");
    /// let observed = RequestId::scope(id.clone(), async { RequestId::current() }).await;
    /// assert_eq!(observed, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(request_id: RequestId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(request_id, fut).await
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Middleware attaching a [`RequestId`], echoing it as `X-Request-Id` and
/// logging each request with its method, path, status and duration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::middleware::RequestTracing;
///
/// let app = App::new().wrap(RequestTracing);
/// ```
#[derive(Clone)]
pub struct RequestTracing;

impl<S, B> Transform<S, ServiceRequest> for RequestTracing
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTracingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTracingMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestTracing`].
///
/// Applications should not use this type directly.
pub struct RequestTracingMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTracingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::for_request(&req);
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let remote_addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned();
        let span = info_span!(
            "http_request",
            request_id = %request_id,
            component = "http",
        );

        let started = span.in_scope(|| {
            debug!(%method, %path, %remote_addr, "request received");
            Instant::now()
        });

        let fut = self.service.call(req);
        let scoped_id = request_id.clone();
        Box::pin(RequestId::scope(
            scoped_id,
            async move {
                let mut res = fut.await?;
                info!(
                    %method,
                    %path,
                    %remote_addr,
                    status = res.status().as_u16(),
                    duration_ms = started.elapsed().as_secs_f64() * 1_000.0,
                    "request"
                );
                match HeaderValue::from_str(request_id.as_str()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(%error, "failed to encode request id header");
                    }
                }
                Ok(res)
            }
            .instrument(span),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{self};
    use actix_web::{App, HttpResponse, web};
    use rstest::rstest;

    async fn call_with_header(header: Option<&str>) -> (String, String) {
        let app = test::init_service(App::new().wrap(RequestTracing).route(
            "/",
            web::get().to(|| async {
                let id = RequestId::current().map(|id| id.to_string());
                HttpResponse::Ok().body(id.unwrap_or_default())
            }),
        ))
        .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(value) = header {
            req = req.insert_header((REQUEST_ID_HEADER, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let echoed = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body").to_owned();
        (echoed, body)
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(RequestId::current().is_none());
    }

    #[tokio::test]
    async fn scope_exposes_the_id() {
        let id = RequestId::from("abc");
        let observed = RequestId::scope(id.clone(), async { RequestId::current() }).await;
        assert_eq!(observed, Some(id));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("has space")]
    fn unusable_header_values_are_ignored(#[case] raw: &str) {
        let value = HeaderValue::from_str(raw).expect("header value");
        assert!(RequestId::from_header(&value).is_none());
    }

    #[rstest]
    fn overlong_header_values_are_ignored() {
        let value = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN + 1)).expect("header");
        assert!(RequestId::from_header(&value).is_none());
        let value = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN)).expect("header");
        assert!(RequestId::from_header(&value).is_some());
    }

    #[actix_web::test]
    async fn generates_a_uuid_when_absent() {
        let (echoed, body) = call_with_header(None).await;
        Uuid::parse_str(&echoed).expect("generated ids are UUIDs");
        assert_eq!(echoed, body);
    }

    #[actix_web::test]
    async fn reuses_a_valid_incoming_id() {
        let (echoed, body) = call_with_header(Some("client-req-7")).await;
        assert_eq!(echoed, "client-req-7");
        assert_eq!(body, "client-req-7");
    }

    #[actix_web::test]
    async fn replaces_an_invalid_incoming_id() {
        let oversized = "x".repeat(MAX_REQUEST_ID_LEN + 10);
        let (echoed, _) = call_with_header(Some(&oversized)).await;
        assert_ne!(echoed, oversized);
        Uuid::parse_str(&echoed).expect("replacement is a UUID");
    }
}
