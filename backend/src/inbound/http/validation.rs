//! Shared validation helpers for inbound HTTP adapters.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::domain::{Error, UserId};

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Validation error codes reported under `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidEmail,
    EmptyName,
    InvalidUuid,
    InvalidPagination,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmptyName => "empty_name",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidPagination => "invalid_pagination",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");

pub(crate) fn field_error(field: FieldName, code: ValidationCode, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Accept `local@domain.tld` shaped addresses.
pub(crate) fn validate_email(email: &str) -> Result<(), Error> {
    let valid = EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email));
    if valid {
        Ok(())
    } else {
        Err(field_error(
            EMAIL,
            ValidationCode::InvalidEmail,
            "email must be a valid email address",
        ))
    }
}

/// Reject names that are blank once trimmed.
pub(crate) fn validate_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(field_error(
            NAME,
            ValidationCode::EmptyName,
            "name must not be empty",
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        Error::invalid_request("userId must be a valid UUID").with_details(json!({
            "field": USER_ID.as_str(),
            "value": raw,
            "code": ValidationCode::InvalidUuid.as_str(),
        }))
    })
}
