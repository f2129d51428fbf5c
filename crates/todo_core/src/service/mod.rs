//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Apply business rules (owner existence, scoping) above raw persistence.
//! - Keep the location-keyed API layer decoupled from storage details.

pub mod todo_service;
pub mod user_service;
