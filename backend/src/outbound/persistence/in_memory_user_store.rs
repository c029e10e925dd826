//! Process-local [`UserStore`] backed by a reader-writer lock.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{User, UserId};

/// User store holding every record in a `HashMap` behind an `RwLock`.
///
/// Reads share the lock; create, update and delete take it exclusively.
/// Guards are never held across an `.await`, so lock hold time is bounded by
/// the map operation itself.
///
/// Listing orders records by `created_at`, then by id, so pages are stable
/// while the record set is unchanged.
///
/// # Examples
/// ```
/// use user_service::domain::ports::UserStore;
/// use user_service::outbound::persistence::InMemoryUserStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryUserStore::new();
/// let (users, total) = store.list(Default::default()).await.expect("list");
/// assert!(users.is_empty());
/// assert_eq!(total, 0);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records, for test assertions.
    ///
    /// Reads through a poisoned lock.
    #[cfg(any(test, feature = "test-support"))]
    pub fn record_count(&self) -> usize {
        self.users
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<UserId, User>>, UserStoreError> {
        self.users
            .read()
            .map_err(|_| UserStoreError::unavailable("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<UserId, User>>, UserStoreError> {
        self.users
            .write()
            .map_err(|_| UserStoreError::unavailable("user store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, usize), UserStoreError> {
        let users = self.read()?;
        let total = users.len();

        let mut ordered: Vec<&User> = users.values().collect();
        ordered.sort_unstable_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let window = page.window(total);
        let selected = ordered
            .into_iter()
            .skip(window.start)
            .take(window.len())
            .cloned()
            .collect();
        Ok((selected, total))
    }

    async fn create(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.write()?;
        if users.contains_key(&user.id) {
            return Err(UserStoreError::already_exists(user.id.to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<User, UserStoreError> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| UserStoreError::not_found(id.to_string()))
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.write()?;
        let Some(stored) = users.get_mut(&user.id) else {
            return Err(UserStoreError::not_found(user.id.to_string()));
        };
        *stored = user.clone();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserStoreError> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserStoreError::not_found(id.to_string()))
    }
}
