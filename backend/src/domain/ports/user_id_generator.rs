//! Driven port supplying identifiers for new users.

use crate::domain::UserId;

/// Source of user identifiers.
///
/// Implementations must not repeat a value within the process lifetime.
#[cfg_attr(test, mockall::automock)]
pub trait UserIdGenerator: Send + Sync {
    /// Produce the identifier for the next created user.
    fn next_id(&self) -> UserId;
}

/// Generator backed by random (v4) UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUserIdGenerator;

impl UserIdGenerator for RandomUserIdGenerator {
    fn next_id(&self) -> UserId {
        UserId::random()
    }
}
