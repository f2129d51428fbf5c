//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.
//! - `open_existing_db` never creates a file and never initializes a blank schema.

use super::migrations::{apply_migrations, current_user_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    Create,
    Existing,
}

impl OpenMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Existing => "existing",
        }
    }
}

/// Connection-level settings applied to every opened store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Creates the store at `path` if needed and brings its schema up to date.
///
/// Safe to call any number of times; only the first call has an effect.
pub fn init_db(path: impl AsRef<Path>) -> DbResult<()> {
    open_db(path).map(drop)
}

/// Opens (creating if absent) a SQLite database file and applies all pending
/// migrations.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with(
        path.as_ref(),
        OpenFlags::default(),
        OpenMode::Create,
        &StoreOptions::default(),
    )
}

/// Opens a database that must already exist and must have been initialized.
///
/// A schema at an older non-zero version is upgraded in place, so stores
/// created before the users table existed keep working.
///
/// # Errors
/// - `DbError::Sqlite` when the file is missing or cannot be opened.
/// - `DbError::SchemaNotInitialized` when the file was never initialized.
pub fn open_existing_db(path: impl AsRef<Path>, options: &StoreOptions) -> DbResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    open_with(path.as_ref(), flags, OpenMode::Existing, options)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    let mut conn = Connection::open_in_memory()?;
    bootstrap_connection(&mut conn, &StoreOptions::default(), true)?;
    info!(
        "event=db_open module=db status=ok mode=memory duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn open_with(
    path: &Path,
    flags: OpenFlags,
    mode: OpenMode,
    options: &StoreOptions,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode_name = mode.as_str();
    info!("event=db_open module=db status=start mode={mode_name}");

    let mut conn = match Connection::open_with_flags(path, flags) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode_name} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, options, mode == OpenMode::Create) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode_name} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode_name} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(
    conn: &mut Connection,
    options: &StoreOptions,
    allow_fresh: bool,
) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(options.busy_timeout)?;
    if !allow_fresh && current_user_version(conn)? == 0 {
        return Err(DbError::SchemaNotInitialized);
    }
    apply_migrations(conn)?;
    Ok(())
}
