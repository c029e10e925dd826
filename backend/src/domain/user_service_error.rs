//! Classified failures of the user service.
//!
//! `NotFound` and `AlreadyExists` are surfaced as their own variants; every
//! other store failure is wrapped in the `*Failed` variant of the operation
//! that hit it, keeping the store error reachable through `source()`.

use thiserror::Error;

use crate::domain::ports::UserStoreError;
use crate::domain::{Error as ApiError, ErrorCode, UserId};

/// Failure raised by a user service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserServiceError {
    /// The targeted user does not exist.
    #[error("user {id} not found")]
    NotFound { id: UserId },
    /// The generated identifier collided with a live record.
    #[error("user {id} already exists")]
    AlreadyExists { id: UserId },
    /// Listing users failed.
    #[error("failed to list users")]
    ListFailed(#[source] UserStoreError),
    /// Creating a user failed.
    #[error("failed to create user")]
    CreateFailed(#[source] UserStoreError),
    /// Fetching a user failed.
    #[error("failed to get user")]
    GetFailed(#[source] UserStoreError),
    /// Updating a user failed.
    #[error("failed to update user")]
    UpdateFailed(#[source] UserStoreError),
    /// Deleting a user failed.
    #[error("failed to delete user")]
    DeleteFailed(#[source] UserStoreError),
}

/// Fieldless view of [`UserServiceError`] for matching on the outcome only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserErrorKind {
    /// The targeted user does not exist.
    NotFound,
    /// The generated identifier collided with a live record.
    AlreadyExists,
    /// Listing users failed.
    ListFailed,
    /// Creating a user failed.
    CreateFailed,
    /// Fetching a user failed.
    GetFailed,
    /// Updating a user failed.
    UpdateFailed,
    /// Deleting a user failed.
    DeleteFailed,
}

impl UserServiceError {
    /// Classified kind of this failure.
    pub fn kind(&self) -> UserErrorKind {
        match self {
            Self::NotFound { .. } => UserErrorKind::NotFound,
            Self::AlreadyExists { .. } => UserErrorKind::AlreadyExists,
            Self::ListFailed(_) => UserErrorKind::ListFailed,
            Self::CreateFailed(_) => UserErrorKind::CreateFailed,
            Self::GetFailed(_) => UserErrorKind::GetFailed,
            Self::UpdateFailed(_) => UserErrorKind::UpdateFailed,
            Self::DeleteFailed(_) => UserErrorKind::DeleteFailed,
        }
    }

    /// True when the targeted user does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Underlying store failure for the wrapped variants.
    pub fn store_error(&self) -> Option<&UserStoreError> {
        match self {
            Self::NotFound { .. } | Self::AlreadyExists { .. } => None,
            Self::ListFailed(err)
            | Self::CreateFailed(err)
            | Self::GetFailed(err)
            | Self::UpdateFailed(err)
            | Self::DeleteFailed(err) => Some(err),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(value: UserServiceError) -> Self {
        let (code, message) = match value.kind() {
            UserErrorKind::NotFound => (ErrorCode::UserNotFound, "User not found"),
            UserErrorKind::AlreadyExists => (ErrorCode::UserAlreadyExists, "User already exists"),
            UserErrorKind::ListFailed => (ErrorCode::ListUsersFailed, "Failed to list users"),
            UserErrorKind::CreateFailed => (ErrorCode::CreateUserFailed, "Failed to create user"),
            UserErrorKind::GetFailed => (ErrorCode::GetUserFailed, "Failed to get user"),
            UserErrorKind::UpdateFailed => (ErrorCode::UpdateUserFailed, "Failed to update user"),
            UserErrorKind::DeleteFailed => (ErrorCode::DeleteUserFailed, "Failed to delete user"),
        };
        Self::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error as _;

    fn unavailable() -> UserStoreError {
        UserStoreError::unavailable("lock poisoned")
    }

    #[rstest]
    #[case(UserServiceError::ListFailed(unavailable()), ErrorCode::ListUsersFailed)]
    #[case(UserServiceError::CreateFailed(unavailable()), ErrorCode::CreateUserFailed)]
    #[case(UserServiceError::GetFailed(unavailable()), ErrorCode::GetUserFailed)]
    #[case(UserServiceError::UpdateFailed(unavailable()), ErrorCode::UpdateUserFailed)]
    #[case(UserServiceError::DeleteFailed(unavailable()), ErrorCode::DeleteUserFailed)]
    fn wrapped_failures_keep_their_source(
        #[case] error: UserServiceError,
        #[case] expected: ErrorCode,
    ) {
        assert!(!error.is_not_found());
        assert_eq!(error.store_error(), Some(&unavailable()));
        let source = error.source().expect("wrapped store error");
        assert_eq!(source.to_string(), unavailable().to_string());
        assert_eq!(ApiError::from(error).code(), expected);
    }

    #[rstest]
    fn not_found_is_distinguishable() {
        let error = UserServiceError::NotFound {
            id: UserId::random(),
        };
        assert!(error.is_not_found());
        assert_eq!(error.kind(), UserErrorKind::NotFound);
        assert!(error.store_error().is_none());
        assert_eq!(ApiError::from(error).code(), ErrorCode::UserNotFound);
    }

    #[rstest]
    fn api_messages_do_not_leak_store_details() {
        let api = ApiError::from(UserServiceError::GetFailed(unavailable()));
        assert_eq!(api.message(), "Failed to get user");
        assert!(api.code().is_internal());
    }
}
