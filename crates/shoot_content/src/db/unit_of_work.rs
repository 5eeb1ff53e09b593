//! Caller-side transaction scope for repository calls.
//!
//! Repositories never open or commit transactions themselves. Request
//! handlers use `run_in_transaction` to group several repository calls into
//! one unit of work and pass `&Transaction` (which derefs to `Connection`)
//! to each of them.

use super::DbError;
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `work` inside an immediate transaction.
///
/// Commits when `work` returns `Ok`. Any `Err` drops the transaction, which
/// rolls it back, and is returned unchanged.
///
/// # Errors
/// - Begin/commit failures are converted through `From<DbError>`.
pub fn run_in_transaction<T, E>(
    conn: &mut Connection,
    work: impl FnOnce(&Transaction<'_>) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DbError>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(DbError::from)?;

    match work(&tx) {
        Ok(value) => {
            tx.commit().map_err(DbError::from)?;
            debug!("event=unit_of_work module=db status=ok outcome=commit");
            Ok(value)
        }
        Err(err) => {
            warn!("event=unit_of_work module=db status=error outcome=rollback");
            Err(err)
        }
    }
}
