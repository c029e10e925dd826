//! Server construction and middleware wiring.

mod config;

pub use config::ServerSettings;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use user_service::RequestTracing;
use user_service::middleware::{CatchPanic, cors_policy};
use user_service::domain::UserService;
use user_service::domain::ports::RandomUserIdGenerator;
use user_service::inbound::http::configure;
use user_service::inbound::http::health::HealthState;
use user_service::inbound::http::state::HttpState;
use user_service::logging::LogControl;
use user_service::outbound::persistence::InMemoryUserStore;

/// Wire the user service over a fresh in-memory store.
pub fn build_http_state(log_control: Arc<LogControl>) -> HttpState {
    let service = Arc::new(UserService::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(DefaultClock),
        Arc::new(RandomUserIdGenerator),
    ));
    HttpState::new(service.clone(), service, log_control)
}

/// Middleware runs outermost first: request id and access log, then CORS,
/// then panic recovery around the handlers.
fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(CatchPanic)
        .wrap(cors_policy())
        .wrap(RequestTracing)
        .configure(configure)
}

/// Construct an Actix HTTP server bound according to `settings`.
///
/// Readiness flips to true once the listener is bound. actix-web installs
/// SIGINT/SIGTERM handlers and drains in-flight requests for up to
/// `shutdown_timeout_secs` before stopping.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    settings: &ServerSettings,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .keep_alive(settings.keep_alive())
        .client_request_timeout(settings.read_timeout())
        .shutdown_timeout(settings.shutdown_timeout_secs())
        .bind((settings.host(), settings.port()))?
        .run();

    health_state.mark_ready();
    Ok(server)
}
