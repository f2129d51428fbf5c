//! Todo use-case service.
//!
//! # Responsibility
//! - Provide unscoped and user-scoped CRUD entry points.
//! - Reject todos for owners that do not exist.
//!
//! # Invariants
//! - User-scoped calls always pass `OwnerScope::User`, so a foreign or
//!   unowned todo reads as missing and is never mutated.

use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::model::user::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::todo_repo::{OwnerScope, TodoListQuery, TodoRepository, WriteOutcome};
use crate::repo::user_repo::UserRepository;
use log::debug;

/// Use-case service for todo operations.
pub struct TodoService<T: TodoRepository, U: UserRepository> {
    todos: T,
    users: U,
}

impl<T: TodoRepository, U: UserRepository> TodoService<T, U> {
    pub fn new(todos: T, users: U) -> Self {
        Self { todos, users }
    }

    /// Creates an unowned todo and returns its id.
    pub fn create_todo(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> RepoResult<TodoId> {
        let request = NewTodo::new(title).with_description(description);
        let id = self.todos.create_todo(&request)?;
        debug!("event=todo_create module=service status=ok todo_id={id} scoped=false");
        Ok(id)
    }

    pub fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        self.todos.get_todo(OwnerScope::Any, id)
    }

    /// Applies `patch` to any todo by id, regardless of owner.
    pub fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<WriteOutcome> {
        let outcome = self.todos.update_todo(OwnerScope::Any, id, patch)?;
        debug!("event=todo_update module=service todo_id={id} outcome={outcome:?}");
        Ok(outcome)
    }

    pub fn delete_todo(&self, id: TodoId) -> RepoResult<WriteOutcome> {
        let outcome = self.todos.delete_todo(OwnerScope::Any, id)?;
        debug!("event=todo_delete module=service todo_id={id} outcome={outcome:?}");
        Ok(outcome)
    }

    pub fn list_todos(&self, completed: Option<bool>) -> RepoResult<Vec<Todo>> {
        self.todos.list_todos(&TodoListQuery {
            scope: OwnerScope::Any,
            completed,
        })
    }

    /// Creates a todo owned by `user_id`.
    ///
    /// # Contract
    /// - Returns `RepoError::OwnerNotFound` when the user does not exist.
    /// - Title validation runs before the owner lookup.
    pub fn create_user_todo(
        &self,
        user_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> RepoResult<TodoId> {
        let request = NewTodo::new(title)
            .with_description(description)
            .owned_by(user_id);
        request.validate()?;

        if !self.users.user_exists(user_id)? {
            return Err(RepoError::OwnerNotFound(user_id));
        }

        let id = self.todos.create_todo(&request)?;
        debug!("event=todo_create module=service status=ok todo_id={id} user_id={user_id}");
        Ok(id)
    }

    pub fn get_user_todo(&self, user_id: UserId, todo_id: TodoId) -> RepoResult<Option<Todo>> {
        self.todos.get_todo(OwnerScope::User(user_id), todo_id)
    }

    pub fn update_user_todo(
        &self,
        user_id: UserId,
        todo_id: TodoId,
        patch: &TodoPatch,
    ) -> RepoResult<WriteOutcome> {
        let outcome = self
            .todos
            .update_todo(OwnerScope::User(user_id), todo_id, patch)?;
        debug!(
            "event=todo_update module=service todo_id={todo_id} user_id={user_id} outcome={outcome:?}"
        );
        Ok(outcome)
    }

    pub fn delete_user_todo(&self, user_id: UserId, todo_id: TodoId) -> RepoResult<WriteOutcome> {
        let outcome = self.todos.delete_todo(OwnerScope::User(user_id), todo_id)?;
        debug!(
            "event=todo_delete module=service todo_id={todo_id} user_id={user_id} outcome={outcome:?}"
        );
        Ok(outcome)
    }

    pub fn list_user_todos(
        &self,
        user_id: UserId,
        completed: Option<bool>,
    ) -> RepoResult<Vec<Todo>> {
        self.todos.list_todos(&TodoListQuery {
            scope: OwnerScope::User(user_id),
            completed,
        })
    }
}
