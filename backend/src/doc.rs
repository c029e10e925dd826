//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the request, response and error schemas they reference. The document
//! is exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::{ProbeResponse, ProbeStatus};
use crate::inbound::http::management::LogSettingsResponse;
use crate::inbound::http::users::{
    CreateUserRequest, PaginationResponse, UpdateUserRequest, UserResponse, UsersResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "CRUD operations over users, health probes and runtime log control."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::health,
        crate::inbound::http::health::readyz,
        crate::inbound::http::management::set_log_level,
    ),
    components(schemas(
        UserResponse,
        UsersResponse,
        PaginationResponse,
        CreateUserRequest,
        UpdateUserRequest,
        ProbeResponse,
        ProbeStatus,
        LogSettingsResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Operations on users"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "management", description = "Runtime configuration")
    )
)]
pub struct ApiDoc;
