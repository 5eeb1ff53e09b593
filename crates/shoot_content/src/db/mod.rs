//! SQLite storage bootstrap and unit-of-work entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for template storage.
//! - Apply the idempotent template schema on every open.
//! - Give callers a transaction scope to hand to repository calls.
//!
//! # Invariants
//! - The schema script only uses `IF NOT EXISTS` statements.
//! - Repository code never reads or writes before the schema is applied.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod unit_of_work;

pub use open::{open_db, open_db_in_memory};
pub use unit_of_work::run_in_transaction;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
