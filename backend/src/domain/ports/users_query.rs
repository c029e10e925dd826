//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to read users without
//! importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{User, UserId, UserServiceError};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return one page of users with the total count and `has_more` flag.
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UserServiceError>;

    /// Fetch a single user.
    async fn get_user(&self, id: &UserId) -> Result<User, UserServiceError>;
}
