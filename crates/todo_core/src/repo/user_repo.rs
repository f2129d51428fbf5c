//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Username/email uniqueness is decided by the UNIQUE constraints on insert,
//!   never by a read-then-write check.
//! - Listing order is `id ASC`.

use super::error::{is_unique_violation, RepoError, RepoResult, UserField};
use super::schema_check::{ensure_connection_ready, USER_COLUMNS};
use crate::model::now_epoch_ms;
use crate::model::user::{NewUser, User, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, email, created_at FROM users";

/// Repository interface for user operations.
pub trait UserRepository {
    fn create_user(&self, user: &NewUser) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn user_exists(&self, id: UserId) -> RepoResult<bool>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Binds the repository to a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<UserId> {
        user.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO users (username, email, created_at) VALUES (?1, ?2, ?3);",
            params![user.username.as_str(), user.email.as_str(), now_epoch_ms()],
        );

        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(duplicate_user_error(&err, user)),
            Err(err) => Err(err.into()),
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1;"),
                [username],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn user_exists(&self, id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}

/// Maps a UNIQUE failure to the column SQLite reported, e.g.
/// `UNIQUE constraint failed: users.email`.
fn duplicate_user_error(err: &rusqlite::Error, user: &NewUser) -> RepoError {
    let message = match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => message.as_str(),
        _ => "",
    };

    if message.contains("users.email") {
        RepoError::DuplicateUser {
            field: UserField::Email,
            value: user.email.clone(),
        }
    } else {
        RepoError::DuplicateUser {
            field: UserField::Username,
            value: user.username.clone(),
        }
    }
}
