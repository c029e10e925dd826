//! Driven port for the canonical user record set.
//!
//! The store owns every live [`User`]. Implementations must hand out and keep
//! owned copies so no caller can reach stored state through a returned value,
//! and must allow concurrent reads while serialising writes.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// No record with the given identifier exists.
        NotFound { id: String } => "user {id} not found",
        /// A record with the given identifier already exists.
        AlreadyExists { id: String } => "user {id} already exists",
        /// The backing store could not serve the request.
        Unavailable { message: String } => "user store unavailable: {message}",
    }
}

impl UserStoreError {
    /// True for [`UserStoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for keyed user storage with offset pagination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return the records inside `page` plus the total record count.
    ///
    /// An offset past the end yields an empty list rather than an error.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, usize), UserStoreError>;

    /// Insert a new record; fails with `AlreadyExists` on an id collision.
    async fn create(&self, user: &User) -> Result<(), UserStoreError>;

    /// Fetch a record by identifier.
    async fn get_by_id(&self, id: &UserId) -> Result<User, UserStoreError>;

    /// Replace an existing record in full; never inserts.
    async fn update(&self, user: &User) -> Result<(), UserStoreError>;

    /// Remove a record permanently.
    async fn delete(&self, id: &UserId) -> Result<(), UserStoreError>;
}
