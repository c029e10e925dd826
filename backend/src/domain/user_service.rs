//! User domain service.
//!
//! Stateless orchestration over a [`UserStore`]: assigns identifiers and
//! timestamps, applies partial updates, computes pagination metadata and
//! classifies store failures. Nothing is retried; every failure reaches the
//! caller as a [`UserServiceError`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{debug, error, warn};

use crate::domain::ports::{UserIdGenerator, UserStore, UserStoreError, UsersCommand, UsersQuery};
use crate::domain::{NewUser, User, UserId, UserPatch, UserServiceError};

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn UserIdGenerator>,
}

impl<S> UserService<S> {
    /// Create a new service over `store`, stamping records with `clock` and
    /// naming them with `ids`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, ids: Arc<dyn UserIdGenerator>) -> Self {
        Self { store, clock, ids }
    }
}

impl<S> UserService<S>
where
    S: UserStore,
{
    /// Map a store failure for an operation targeting `id`, letting
    /// `NotFound` through unchanged.
    fn classify(
        id: &UserId,
        error: UserStoreError,
        wrap: fn(UserStoreError) -> UserServiceError,
    ) -> UserServiceError {
        if error.is_not_found() {
            UserServiceError::NotFound { id: id.clone() }
        } else {
            wrap(error)
        }
    }

    fn log_failure(operation: &'static str, id: Option<&UserId>, err: &UserServiceError) {
        match (err, id) {
            (UserServiceError::NotFound { .. }, Some(id)) => {
                debug!(user_id = %id, operation, "user not found");
            }
            (_, Some(id)) => error!(user_id = %id, operation, error = ?err, "user operation failed"),
            (_, None) => error!(operation, error = ?err, "user operation failed"),
        }
    }
}

#[async_trait]
impl<S> UsersQuery for UserService<S>
where
    S: UserStore,
{
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UserServiceError> {
        let (users, total) = self.store.list(page).await.map_err(|err| {
            let err = UserServiceError::ListFailed(err);
            Self::log_failure("list", None, &err);
            err
        })?;
        let page = Page::new(users, total, page);
        debug!(
            returned = page.items().len(),
            total,
            limit = page.limit(),
            offset = page.offset(),
            has_more = page.has_more(),
            "listed users"
        );
        Ok(page)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserServiceError> {
        self.store.get_by_id(id).await.map_err(|err| {
            let err = Self::classify(id, err, UserServiceError::GetFailed);
            Self::log_failure("get", Some(id), &err);
            err
        })
    }
}

#[async_trait]
impl<S> UsersCommand for UserService<S>
where
    S: UserStore,
{
    async fn create_user(&self, input: NewUser) -> Result<User, UserServiceError> {
        let user = User::create(self.ids.next_id(), input, self.clock.utc());

        match self.store.create(&user).await {
            Ok(()) => {
                debug!(user_id = %user.id, "user created");
                Ok(user)
            }
            Err(UserStoreError::AlreadyExists { .. }) => {
                warn!(user_id = %user.id, "generated user id collided with a live record");
                Err(UserServiceError::AlreadyExists { id: user.id })
            }
            Err(err) => {
                let err = UserServiceError::CreateFailed(err);
                Self::log_failure("create", Some(&user.id), &err);
                Err(err)
            }
        }
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, UserServiceError> {
        let fail = |err: UserStoreError| {
            let err = Self::classify(id, err, UserServiceError::UpdateFailed);
            Self::log_failure("update", Some(id), &err);
            err
        };

        let mut user = self.store.get_by_id(id).await.map_err(fail)?;
        let empty_patch = patch.is_empty();
        patch.apply(&mut user);
        // Wall clocks can step backwards; keep created_at <= updated_at.
        user.updated_at = self.clock.utc().max(user.created_at);

        self.store.update(&user).await.map_err(fail)?;
        debug!(user_id = %user.id, empty_patch, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserServiceError> {
        self.store.delete(id).await.map_err(|err| {
            let err = Self::classify(id, err, UserServiceError::DeleteFailed);
            Self::log_failure("delete", Some(id), &err);
            err
        })?;
        debug!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
