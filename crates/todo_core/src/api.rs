//! Location-keyed operations for host processes.
//!
//! # Responsibility
//! - Expose every todo/user use case as a plain function taking a store path.
//! - Own the connection lifecycle: one connection per call, dropped on return.
//!
//! # Invariants
//! - No connection or store location is cached between calls.
//! - Input validation runs before the store is opened.
//! - Operations never initialize a store; `init_db` must have run first.

use crate::db::{self, open_existing_db, StoreOptions};
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::model::user::{NewUser, User, UserId};
use crate::repo::error::RepoResult;
use crate::repo::todo_repo::{SqliteTodoRepository, WriteOutcome};
use crate::repo::user_repo::SqliteUserRepository;
use crate::service::todo_service::TodoService;
use crate::service::user_service::UserService;
use log::warn;
use rusqlite::Connection;
use std::path::Path;

type SqliteTodoService<'conn> =
    TodoService<SqliteTodoRepository<'conn>, SqliteUserRepository<'conn>>;

/// Creates the store at `db_path` if absent and applies the schema.
///
/// Idempotent: later calls leave an up-to-date store unchanged.
pub fn init_db(db_path: impl AsRef<Path>) -> RepoResult<()> {
    db::init_db(db_path)?;
    Ok(())
}

/// Creates an unowned todo. `description` may be empty.
pub fn create_todo(db_path: impl AsRef<Path>, title: &str, description: &str) -> RepoResult<TodoId> {
    NewTodo::new(title).validate()?;
    with_todo_service(db_path, |service| service.create_todo(title, description))
}

/// Loads a todo by id without ownership filtering.
pub fn get_todo(db_path: impl AsRef<Path>, todo_id: TodoId) -> RepoResult<Option<Todo>> {
    with_todo_service(db_path, |service| service.get_todo(todo_id))
}

/// Merges `patch` into the todo; `updated_at` advances even for an empty patch.
pub fn update_todo(
    db_path: impl AsRef<Path>,
    todo_id: TodoId,
    patch: &TodoPatch,
) -> RepoResult<WriteOutcome> {
    patch.validate()?;
    with_todo_service(db_path, |service| service.update_todo(todo_id, patch))
}

pub fn delete_todo(db_path: impl AsRef<Path>, todo_id: TodoId) -> RepoResult<WriteOutcome> {
    with_todo_service(db_path, |service| service.delete_todo(todo_id))
}

/// Lists all todos in id order, optionally only those with `completed`.
pub fn list_todos(db_path: impl AsRef<Path>, completed: Option<bool>) -> RepoResult<Vec<Todo>> {
    with_todo_service(db_path, |service| service.list_todos(completed))
}

pub fn create_user(db_path: impl AsRef<Path>, username: &str, email: &str) -> RepoResult<UserId> {
    NewUser::new(username, email).validate()?;
    with_user_service(db_path, |service| service.create_user(username, email))
}

pub fn get_user(db_path: impl AsRef<Path>, user_id: UserId) -> RepoResult<Option<User>> {
    with_user_service(db_path, |service| service.get_user(user_id))
}

pub fn get_user_by_username(
    db_path: impl AsRef<Path>,
    username: &str,
) -> RepoResult<Option<User>> {
    with_user_service(db_path, |service| service.get_user_by_username(username))
}

pub fn list_users(db_path: impl AsRef<Path>) -> RepoResult<Vec<User>> {
    with_user_service(db_path, |service| service.list_users())
}

/// Creates a todo owned by `user_id`; unknown users are rejected.
pub fn create_user_todo(
    db_path: impl AsRef<Path>,
    user_id: UserId,
    title: &str,
    description: &str,
) -> RepoResult<TodoId> {
    NewTodo::new(title).validate()?;
    with_todo_service(db_path, |service| {
        service.create_user_todo(user_id, title, description)
    })
}

/// Loads a todo only when `user_id` owns it.
pub fn get_user_todo(
    db_path: impl AsRef<Path>,
    user_id: UserId,
    todo_id: TodoId,
) -> RepoResult<Option<Todo>> {
    with_todo_service(db_path, |service| service.get_user_todo(user_id, todo_id))
}

/// Merges `patch` only when `user_id` owns the todo; otherwise nothing changes.
pub fn update_user_todo(
    db_path: impl AsRef<Path>,
    user_id: UserId,
    todo_id: TodoId,
    patch: &TodoPatch,
) -> RepoResult<WriteOutcome> {
    patch.validate()?;
    with_todo_service(db_path, |service| {
        service.update_user_todo(user_id, todo_id, patch)
    })
}

pub fn delete_user_todo(
    db_path: impl AsRef<Path>,
    user_id: UserId,
    todo_id: TodoId,
) -> RepoResult<WriteOutcome> {
    with_todo_service(db_path, |service| {
        service.delete_user_todo(user_id, todo_id)
    })
}

pub fn list_user_todos(
    db_path: impl AsRef<Path>,
    user_id: UserId,
    completed: Option<bool>,
) -> RepoResult<Vec<Todo>> {
    with_todo_service(db_path, |service| {
        service.list_user_todos(user_id, completed)
    })
}

fn open_session(db_path: &Path) -> RepoResult<Connection> {
    open_existing_db(db_path, &StoreOptions::default()).map_err(|err| {
        warn!("event=session_open module=api status=error error={err}");
        err.into()
    })
}

fn with_todo_service<F, T>(db_path: impl AsRef<Path>, op: F) -> RepoResult<T>
where
    F: FnOnce(&SqliteTodoService<'_>) -> RepoResult<T>,
{
    let conn = open_session(db_path.as_ref())?;
    let service = TodoService::new(
        SqliteTodoRepository::try_new(&conn)?,
        SqliteUserRepository::try_new(&conn)?,
    );
    op(&service)
}

fn with_user_service<F, T>(db_path: impl AsRef<Path>, op: F) -> RepoResult<T>
where
    F: FnOnce(&UserService<SqliteUserRepository<'_>>) -> RepoResult<T>,
{
    let conn = open_session(db_path.as_ref())?;
    let service = UserService::new(SqliteUserRepository::try_new(&conn)?);
    op(&service)
}
