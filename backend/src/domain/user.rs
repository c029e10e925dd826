//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier was not a UUID.
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// Any spelling `Uuid::parse_str` accepts is normalised to the lowercase
/// hyphenated form, so two ids are equal exactly when their UUIDs are. That
/// canonical form is what callers see in API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Stored user record.
///
/// Records are plain values: the store hands out clones, so mutating a
/// returned record never touches the stored one.
///
/// ## Invariants
/// - `id` never changes after creation.
/// - `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly created, active user with both timestamps set to `now`.
    pub fn create(id: UserId, input: NewUser, now: DateTime<Utc>) -> Self {
        let NewUser {
            email,
            name,
            avatar,
        } = input;
        Self {
            id,
            email,
            name,
            avatar,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a user.
///
/// The email is expected to have been validated as email-shaped by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Partial update for a user. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.avatar.is_none()
            && self.is_active.is_none()
    }

    /// Write the present fields onto `user`.
    ///
    /// Timestamps are left alone; the service stamps `updated_at`.
    pub fn apply(self, user: &mut User) {
        let Self {
            email,
            name,
            avatar,
            is_active,
        } = self;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(avatar) = avatar {
            user.avatar = Some(avatar);
        }
        if let Some(is_active) = is_active {
            user.is_active = is_active;
        }
    }
}
