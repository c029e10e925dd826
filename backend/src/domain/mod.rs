//! Domain primitives, ports and services.
//!
//! Purpose: define the user record, its identifier and update inputs, the
//! ports separating the domain from its adapters, and the service that
//! orchestrates user operations over a store.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, UserId, NewUser, UserPatch: the user record and its inputs.
//! - UserService: driving port implementation over a `UserStore`.
//! - UserServiceError, UserErrorKind: classified service failures.

pub mod error;
pub mod ports;
pub mod user;
pub mod user_service;
pub mod user_service_error;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{NewUser, User, UserId, UserPatch, UserValidationError};
pub use self::user_service::UserService;
pub use self::user_service_error::{UserErrorKind, UserServiceError};
