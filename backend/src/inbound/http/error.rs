//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::debug;

use crate::domain::{Error, ErrorCode};
use crate::middleware::{REQUEST_ID_HEADER, RequestId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::InvalidLogLevel | ErrorCode::InvalidLogFormat => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        ErrorCode::UserAlreadyExists => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = RequestId::current() {
            builder.insert_header((REQUEST_ID_HEADER, id.to_string()));
        }
        builder.json(self)
    }
}

/// Map JSON body extraction failures onto `INVALID_REQUEST`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting request body");
    Error::invalid_request("Invalid request body").into()
}

/// Map query string extraction failures onto `INVALID_REQUEST`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting query string");
    Error::invalid_request("Invalid query parameters").into()
}

/// Map path extraction failures onto `INVALID_REQUEST`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting path parameters");
    Error::invalid_request("Invalid path parameters").into()
}
