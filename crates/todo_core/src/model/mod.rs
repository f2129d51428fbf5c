//! Domain model for users and their todo items.
//!
//! # Responsibility
//! - Define the records returned to callers and the requests they send.
//! - Keep validation rules next to the types they guard.
//!
//! # Invariants
//! - Identifiers are storage-assigned integers and never reused.
//! - Timestamps are Unix epoch milliseconds.

pub mod todo;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
