//! Classified error type shared by repository backends and services.
//!
//! # Responsibility
//! - Wrap backend failures with a static description, ordered diagnostic
//!   fields and the original cause.
//! - Give callers a stable `ErrorKind` to branch on.
//!
//! # Invariants
//! - Backend causes are kept as `source()`, never flattened into text only.
//! - Field order is insertion order, so rendered messages are deterministic.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Boxed cause carried by a `RepoError`.
pub type BoxedCause = Box<dyn Error + Send + Sync + 'static>;

/// Classification of a repository or service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend failed to read, write or delete.
    Storage,
    /// Caller handed in a value the store must not accept.
    InvalidInput,
    /// A persisted row could not be decoded into a `Template`.
    InvalidData,
    /// A use case required an existing record and found none.
    ///
    /// Repository lookups never produce this kind.
    NotFound,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::InvalidInput => "invalid_input",
            Self::InvalidData => "invalid_data",
            Self::NotFound => "not_found",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error with kind, message, diagnostic fields and cause.
#[derive(Debug)]
pub struct RepoError {
    kind: ErrorKind,
    message: &'static str,
    fields: Vec<(&'static str, String)>,
    source: Option<BoxedCause>,
}

impl RepoError {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            fields: Vec::new(),
            source: None,
        }
    }

    /// Wraps a backend failure as `ErrorKind::Storage`.
    pub fn storage(cause: impl Into<BoxedCause>, message: &'static str) -> Self {
        Self::new(ErrorKind::Storage, message).with_source(cause)
    }

    /// Appends one diagnostic key/value pair.
    pub fn with_field(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((key, value.into()));
        self
    }

    pub fn with_source(mut self, cause: impl Into<BoxedCause>) -> Self {
        self.source = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Returns the first field value recorded under `key`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)?;
        if !self.fields.is_empty() {
            f.write_str(" (")?;
            for (index, (key, value)) in self.fields.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            f.write_str(")")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn Error + 'static))
    }
}

/// Begin/commit failures of a caller-owned unit of work.
impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::storage(value, "storage operation failed")
    }
}
