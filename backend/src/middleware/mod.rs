//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns such
//! as request correlation, access logging, panic recovery and CORS.

pub mod cors;
pub mod recovery;
pub mod request_id;

pub use cors::{CORS_MAX_AGE_SECS, cors_policy};
pub use recovery::CatchPanic;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestTracing};
