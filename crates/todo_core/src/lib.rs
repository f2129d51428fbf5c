//! Core data-access layer for users and their todo items.
//! This crate is the single source of truth for ownership and update invariants.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{
    create_todo, create_user, create_user_todo, delete_todo, delete_user_todo, get_todo,
    get_user, get_user_by_username, get_user_todo, init_db, list_todos, list_user_todos,
    list_users, update_todo, update_user_todo,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::todo::{NewTodo, Todo, TodoId, TodoPatch, TodoValidationError};
pub use model::user::{NewUser, User, UserId, UserValidationError};
pub use repo::error::{ErrorKind, RepoError, RepoResult, UserField};
pub use repo::todo_repo::{
    OwnerScope, SqliteTodoRepository, TodoListQuery, TodoRepository, WriteOutcome,
};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::todo_service::TodoService;
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
