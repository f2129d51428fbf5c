//! Schema versions for the todo store and the runner that applies them.
//!
//! # Schema history
//! - v1: `todos` only. Every todo is unscoped.
//! - v2: adds `users` and a nullable `todos.owner_id` foreign key. Rows
//!   written under v1 keep `owner_id = NULL` and stay visible to unscoped
//!   operations.
//!
//! # Invariants
//! - `PRAGMA user_version` records the last applied step.
//! - Pending steps run in one transaction: a store is either fully upgraded
//!   or left at its previous version.
//! - A step only adds tables, columns and indexes; it never rewrites rows.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// One forward-only schema step.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "todos",
        sql: include_str!("0001_todos.sql"),
    },
    SchemaStep {
        version: 2,
        name: "users_and_owner",
        sql: include_str!("0002_users.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the connection's schema up to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the store was written by a
///   newer build; nothing is changed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!("event=migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    info!(
        "event=migrate_step module=db version={} name={}",
        step.version, step.name
    );
    Ok(())
}
