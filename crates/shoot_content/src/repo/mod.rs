//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the backend-agnostic template repository contract.
//! - Isolate SQLite query details from service/business orchestration.
//! - Provide an in-memory backend with identical observable behavior.
//!
//! # Invariants
//! - Every operation receives the caller's handle explicitly; no backend
//!   keeps a connection between calls.
//! - Lookup misses and deletes of missing rows are successes.
//! - Backend failures are wrapped as `ErrorKind::Storage`, never swallowed.
//! - Write stamps are strictly increasing within one process, so back-to-back
//!   writes never tie on `updated_at`.

use crate::error::{ErrorKind, RepoError, RepoResult};
use crate::model::template::Template;
use log::{debug, warn};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub mod memory_repo;
pub mod template_repo;

/// Last stamp handed out by `next_write_stamp`, in epoch microseconds.
static LAST_WRITE_STAMP: AtomicI64 = AtomicI64::new(0);

/// Rejects values the store must never persist.
pub(crate) fn ensure_writable(template: &Template) -> RepoResult<()> {
    if template.uuid.is_empty() {
        return Err(RepoError::new(
            ErrorKind::InvalidInput,
            "template uuid must not be empty",
        ));
    }
    if template.created_by.is_empty() {
        return Err(RepoError::new(
            ErrorKind::InvalidInput,
            "template created_by must not be empty",
        )
        .with_field("uuid", template.uuid.as_str()));
    }
    Ok(())
}

/// Returns a stamped copy of `template` ready to persist.
///
/// The caller's value is only replaced once the backend accepted the copy.
pub(crate) fn stamped_for_write(template: &Template) -> Template {
    let now = next_write_stamp();
    let mut stamped = template.clone();
    if stamped.created_at == 0 {
        stamped.created_at = now;
    }
    stamped.updated_at = now;
    stamped
}

/// Epoch microseconds, strictly greater than every earlier stamp of this
/// process.
pub(crate) fn next_write_stamp() -> i64 {
    let now = now_epoch_micros();
    let previous = LAST_WRITE_STAMP
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    now.max(previous.saturating_add(1))
}

fn now_epoch_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Emits one metadata-only event per repository call.
pub(crate) fn log_outcome<T>(
    backend: &'static str,
    op: &'static str,
    started_at: Instant,
    result: &RepoResult<T>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => debug!(
            "event=template_repo module=repo status=ok backend={backend} op={op} duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event=template_repo module=repo status=error backend={backend} op={op} duration_ms={duration_ms} error_kind={} error={err}",
            err.kind()
        ),
    }
}
