//! Driving port for user mutations.
//!
//! Inbound adapters (HTTP handlers) call this port to create, update and
//! delete users without depending on how records are stored.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserPatch, UserServiceError};

/// Domain use-case port for user mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an active user with a fresh identifier.
    async fn create_user(&self, input: NewUser) -> Result<User, UserServiceError>;

    /// Apply a partial update and return the stored result.
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, UserServiceError>;

    /// Delete a user permanently.
    async fn delete_user(&self, id: &UserId) -> Result<(), UserServiceError>;
}
