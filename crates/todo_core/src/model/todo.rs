//! Todo domain model.
//!
//! # Responsibility
//! - Define the persisted todo record and its write-side request shapes.
//! - Validate caller input before it reaches storage.
//!
//! # Invariants
//! - `title` is never empty or whitespace-only.
//! - `updated_at >= created_at`, and both are equal right after creation.
//! - `user_id == None` marks an unscoped todo that no user owns.

use super::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate todo identifier assigned by storage.
pub type TodoId = i64;

/// Persisted todo record.
///
/// Serialized key names (`id`, `title`, `description`, `completed`,
/// `created_at`, `updated_at`, `user_id`) are part of the public contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Advances on every successful update.
    pub updated_at: i64,
    /// Owning user, stored in the `owner_id` column.
    pub user_id: Option<UserId>,
}

/// Validation failures for todo writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "todo title must not be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// Insert request for a new todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub owner: Option<UserId>,
}

impl NewTodo {
    /// Builds an unscoped todo request with an empty description.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            owner: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn owned_by(mut self, user_id: UserId) -> Self {
        self.owner = Some(user_id);
        self
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)
    }
}

/// Partial update for an existing todo.
///
/// `None` means "leave unchanged". `Some(String::new())` for `description`
/// really clears it; it is not treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns whether the patch carries no field changes.
    ///
    /// An empty patch still refreshes `updated_at` when applied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        match self.title.as_deref() {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if title.trim().is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(())
}
