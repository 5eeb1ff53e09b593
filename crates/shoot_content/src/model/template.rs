//! Template domain model.
//!
//! # Responsibility
//! - Define the canonical template record shared by repository backends.
//!
//! # Invariants
//! - `uuid` is assigned before the first write and never changes.
//! - `created_by` is never empty for a persisted record and never mutated
//!   after creation.
//! - `Template::default()` is the zero value returned for lookup misses.

use serde::{Deserialize, Serialize};

/// Stable identifier of a template.
///
/// Kept as plain text: the repository enforces no format on it.
pub type TemplateId = String;

/// User-authored content document owned by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Primary key, unique across all stored templates.
    pub uuid: TemplateId,
    /// Display name shown in template listings.
    pub name: String,
    pub subject: String,
    /// Inbox preview line. `None` when the author left it blank.
    pub preview_text: Option<String>,
    pub html_body: String,
    /// Identifier of the owning user.
    pub created_by: String,
    /// Unix epoch microseconds of the first write.
    pub created_at: i64,
    /// Unix epoch microseconds of the latest write. Owner listings sort on it.
    pub updated_at: i64,
}

impl Template {
    /// Returns whether this is the zero value produced by a lookup miss.
    pub fn is_zero(&self) -> bool {
        self.uuid.is_empty()
    }
}
