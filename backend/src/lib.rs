//! User service library modules.
//!
//! The domain layer ([`domain`]) owns the user record, the store and
//! use-case ports, and the [`domain::UserService`] orchestrating them.
//! Adapters live at the edges: [`outbound::persistence`] provides the
//! in-memory store and [`inbound::http`] the actix-web handlers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod logging;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::RequestTracing;
