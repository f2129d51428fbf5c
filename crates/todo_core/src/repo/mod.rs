//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for todos and users.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate input before any SQL mutation.
//! - "Not found" is a value (`None` / `WriteOutcome::NotFound`), never an error.
//! - Ownership filtering happens inside the SQL statement, not after the fact.

pub mod error;
mod schema_check;
pub mod todo_repo;
pub mod user_repo;
