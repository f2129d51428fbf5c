//! User domain model.
//!
//! # Invariants
//! - `username` and `email` are unique across the store (enforced by storage).
//! - Users are immutable after creation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email shape regex"));

/// Surrogate user identifier assigned by storage.
pub type UserId = i64;

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Validation failures for user creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    /// Username carries leading or trailing whitespace.
    PaddedUsername(String),
    EmptyEmail,
    InvalidEmail(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::PaddedUsername(value) => {
                write!(f, "username `{value}` has surrounding whitespace")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail(value) => write!(f, "email `{value}` is not a valid address"),
        }
    }
}

impl Error for UserValidationError {}

/// Insert request for a new user.
///
/// `new` trims both fields, so the stored text is what uniqueness compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            email: email.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username != self.username {
            return Err(UserValidationError::PaddedUsername(self.username.clone()));
        }
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !EMAIL_SHAPE_RE.is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewUser, UserValidationError};

    #[test]
    fn accepts_plain_address() {
        assert!(NewUser::new("alice", "alice@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            NewUser::new(" ", "a@x.com").validate(),
            Err(UserValidationError::EmptyUsername)
        );
        assert_eq!(
            NewUser::new("alice", "").validate(),
            Err(UserValidationError::EmptyEmail)
        );
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let user = NewUser::new(" alice ", " alice@example.com ");
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn literal_padded_fields_are_rejected() {
        let padded_name = NewUser {
            username: "alice ".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert_eq!(
            padded_name.validate(),
            Err(UserValidationError::PaddedUsername("alice ".to_string()))
        );

        let padded_email = NewUser {
            username: "alice".to_string(),
            email: " alice@example.com".to_string(),
        };
        assert!(matches!(
            padded_email.validate(),
            Err(UserValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn rejects_address_without_single_at() {
        for email in ["alice", "a@b@c", "alice @x.com"] {
            assert!(matches!(
                NewUser::new("alice", email).validate(),
                Err(UserValidationError::InvalidEmail(_))
            ));
        }
    }
}
