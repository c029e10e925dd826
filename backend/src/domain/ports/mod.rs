//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`UserStore`], [`UserIdGenerator`]) are implemented by
//! outbound adapters; driving ports ([`UsersQuery`], [`UsersCommand`]) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod user_id_generator;
mod user_store;
mod users_command;
mod users_query;

#[cfg(test)]
pub use user_id_generator::MockUserIdGenerator;
pub use user_id_generator::{RandomUserIdGenerator, UserIdGenerator};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
