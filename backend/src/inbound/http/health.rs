//! Health endpoints: liveness and readiness probes for orchestration and load
//! balancers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;

/// Version reported by the probes.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared readiness flag plus the clock used to stamp probe responses.
pub struct HealthState {
    ready: AtomicBool,
    clock: Arc<dyn Clock>,
}

impl HealthState {
    /// Create a new health state starting as not ready.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            clock,
        }
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn report(&self, status: ProbeStatus) -> ProbeResponse {
        ProbeResponse {
            status,
            timestamp: self.clock.utc(),
            version: SERVICE_VERSION,
        }
    }
}

/// Probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Healthy,
    Ready,
    NotReady,
}

/// Body returned by the health and readiness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeResponse {
    pub status: ProbeStatus,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    #[schema(value_type = String, example = "0.1.0")]
    pub version: &'static str,
}

fn probe_response(ok: bool, body: ProbeResponse) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(body)
}

/// Liveness probe. Returns 200 while the process is serving requests.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Service is alive", body = ProbeResponse)
    )
)]
#[get("/health")]
pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(true, state.report(ProbeStatus::Healthy))
}

/// Readiness probe. Returns 200 once the listener is bound and 503 before.
#[utoipa::path(
    get,
    path = "/readyz",
    tags = ["health"],
    responses(
        (status = 200, description = "Service is ready to handle traffic", body = ProbeResponse),
        (status = 503, description = "Service is not ready", body = ProbeResponse)
    )
)]
#[get("/readyz")]
pub async fn readyz(state: web::Data<HealthState>) -> HttpResponse {
    let ready = state.is_ready();
    let status = if ready {
        ProbeStatus::Ready
    } else {
        ProbeStatus::NotReady
    };
    probe_response(ready, state.report(status))
}
