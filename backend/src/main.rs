//! User service entry-point: loads settings, installs logging and serves the
//! REST API until a shutdown signal arrives.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};

use server::{ServerSettings, build_http_state, create_server};
use user_service::inbound::http::health::{HealthState, SERVICE_VERSION};
use user_service::logging::LogControl;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load configuration: {err}")))?;

    let (log_settings, rejected) = settings.log_settings();
    let log_control = Arc::new(LogControl::install(log_settings).map_err(io::Error::other)?);
    for err in rejected {
        warn!(error = %err, "ignoring configured logging value; using default");
    }

    let health_state = web::Data::new(HealthState::new(Arc::new(DefaultClock)));
    let http_state = build_http_state(Arc::clone(&log_control));
    let server = create_server(health_state, http_state, &settings)?;

    info!(
        host = settings.host(),
        port = settings.port(),
        version = SERVICE_VERSION,
        level = %log_settings.level,
        format = %log_settings.format,
        "user service listening"
    );
    server.await?;
    info!("user service stopped");
    Ok(())
}
