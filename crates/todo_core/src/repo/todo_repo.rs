//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `todos` table.
//! - Express ownership scoping as a SQL predicate shared by every statement.
//!
//! # Invariants
//! - Writes call `validate()` before SQL mutations.
//! - A scoped statement never reads or touches a row owned by someone else.
//! - `updated_at` strictly increases on every applied update.
//! - Listing order is `id ASC`.

use super::error::{is_foreign_key_violation, RepoError, RepoResult};
use super::schema_check::{ensure_connection_ready, TODO_COLUMNS};
use crate::model::now_epoch_ms;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::model::user::UserId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at,
    updated_at,
    owner_id
FROM todos";

/// Which rows a todo statement may see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerScope {
    /// No ownership filter.
    #[default]
    Any,
    /// Only rows whose owner is this user.
    User(UserId),
}

impl OwnerScope {
    fn bind(self) -> Option<UserId> {
        match self {
            Self::Any => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Result of a write addressed at one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// No row visible in the requested scope had that id.
    NotFound,
}

impl WriteOutcome {
    pub fn applied(self) -> bool {
        self == Self::Applied
    }

    fn from_changed(changed: usize) -> Self {
        if changed == 0 {
            Self::NotFound
        } else {
            Self::Applied
        }
    }
}

/// Query options for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    pub scope: OwnerScope,
    pub completed: Option<bool>,
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn create_todo(&self, todo: &NewTodo) -> RepoResult<TodoId>;
    fn get_todo(&self, scope: OwnerScope, id: TodoId) -> RepoResult<Option<Todo>>;
    fn update_todo(
        &self,
        scope: OwnerScope,
        id: TodoId,
        patch: &TodoPatch,
    ) -> RepoResult<WriteOutcome>;
    fn delete_todo(&self, scope: OwnerScope, id: TodoId) -> RepoResult<WriteOutcome>;
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Binds the repository to a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "todos", TODO_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        todo.validate()?;

        let now = now_epoch_ms();
        let inserted = self.conn.execute(
            "INSERT INTO todos (
                title,
                description,
                completed,
                created_at,
                updated_at,
                owner_id
            ) VALUES (?1, ?2, 0, ?3, ?3, ?4);",
            params![
                todo.title.as_str(),
                todo.description.as_str(),
                now,
                todo.owner
            ],
        );

        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_foreign_key_violation(&err) => match todo.owner {
                Some(owner) => Err(RepoError::OwnerNotFound(owner)),
                None => Err(err.into()),
            },
            Err(err) => Err(err.into()),
        }
    }

    fn get_todo(&self, scope: OwnerScope, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE id = ?1
               AND (?2 IS NULL OR owner_id = ?2);"
        ))?;

        let mut rows = stmt.query(params![id, scope.bind()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn update_todo(
        &self,
        scope: OwnerScope,
        id: TodoId,
        patch: &TodoPatch,
    ) -> RepoResult<WriteOutcome> {
        patch.validate()?;

        // NULL parameters keep the stored value; MAX keeps updated_at moving
        // forward even when two updates land in the same millisecond.
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = COALESCE(?3, title),
                description = COALESCE(?4, description),
                completed = COALESCE(?5, completed),
                updated_at = MAX(?6, updated_at + 1)
             WHERE id = ?1
               AND (?2 IS NULL OR owner_id = ?2);",
            params![
                id,
                scope.bind(),
                patch.title.as_deref(),
                patch.description.as_deref(),
                patch.completed.map(bool_to_int),
                now_epoch_ms(),
            ],
        )?;

        Ok(WriteOutcome::from_changed(changed))
    }

    fn delete_todo(&self, scope: OwnerScope, id: TodoId) -> RepoResult<WriteOutcome> {
        let changed = self.conn.execute(
            "DELETE FROM todos
             WHERE id = ?1
               AND (?2 IS NULL OR owner_id = ?2);",
            params![id, scope.bind()],
        )?;

        Ok(WriteOutcome::from_changed(changed))
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let mut sql = format!("{TODO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let OwnerScope::User(owner) = query.scope {
            sql.push_str(" AND owner_id = ?");
            bind_values.push(Value::Integer(owner));
        }

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        user_id: row.get("owner_id")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
