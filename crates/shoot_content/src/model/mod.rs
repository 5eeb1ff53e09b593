//! Domain model for stored content documents.
//!
//! # Responsibility
//! - Define the record shape persisted by the repository layer.
//!
//! # Invariants
//! - Every template is identified by a caller-assigned `uuid`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod template;
