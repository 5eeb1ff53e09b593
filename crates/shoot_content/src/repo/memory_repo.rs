//! In-memory template repository.
//!
//! # Responsibility
//! - Mirror the SQLite backend's observable behavior without a database.
//! - Let services and callers be exercised against an injected fake store.
//!
//! # Invariants
//! - The store is the handle: the repository itself holds no state.
//! - Ordering and upsert rules match `SqliteTemplateRepository`.

use crate::error::{RepoError, RepoResult};
use crate::model::template::Template;
use crate::repo::template_repo::TemplateRepository;
use crate::repo::{ensure_writable, log_outcome, stamped_for_write};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const BACKEND: &str = "memory";

/// Cause attached when a panicking writer left the store lock poisoned.
#[derive(Debug)]
pub struct StorePoisoned;

impl Display for StorePoisoned {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("in-memory template store lock poisoned")
    }
}

impl Error for StorePoisoned {}

/// Caller-owned template storage, shared by reference across calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: Mutex<HashMap<String, Template>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Template>>, StorePoisoned> {
        self.templates.lock().map_err(|_| StorePoisoned)
    }
}

/// Template repository over a `MemoryStore` handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryTemplateRepository;

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    type Conn = MemoryStore;

    fn add_template(&self, conn: &MemoryStore, template: &mut Template) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = ensure_writable(template).and_then(|()| {
            let mut templates = conn
                .lock()
                .map_err(|err| RepoError::storage(err, "failed to add template"))?;
            let mut stamped = stamped_for_write(template);
            if let Some(existing) = templates.get(&stamped.uuid) {
                stamped.created_by = existing.created_by.clone();
                stamped.created_at = existing.created_at;
            }
            templates.insert(stamped.uuid.clone(), stamped.clone());
            *template = stamped;
            Ok(())
        });
        log_outcome(BACKEND, "add_template", started_at, &result);
        result
    }

    fn get_template_by_uuid(&self, conn: &MemoryStore, uuid: &str) -> RepoResult<Template> {
        let started_at = Instant::now();
        let result = conn
            .lock()
            .map(|templates| templates.get(uuid).cloned().unwrap_or_default())
            .map_err(|err| {
                RepoError::storage(err, "failed to query template").with_field("uuid", uuid)
            });
        log_outcome(BACKEND, "get_template_by_uuid", started_at, &result);
        result
    }

    fn find_templates_by_created_by(
        &self,
        conn: &MemoryStore,
        user_uuid: &str,
    ) -> RepoResult<Vec<Template>> {
        let started_at = Instant::now();
        let result = conn
            .lock()
            .map(|templates| {
                let mut owned: Vec<Template> = templates
                    .values()
                    .filter(|template| template.created_by == user_uuid)
                    .cloned()
                    .collect();
                owned.sort_by(|left, right| {
                    right
                        .updated_at
                        .cmp(&left.updated_at)
                        .then_with(|| left.uuid.cmp(&right.uuid))
                });
                owned
            })
            .map_err(|err| {
                RepoError::storage(err, "failed to query templates")
                    .with_field("createdBy", user_uuid)
            });
        log_outcome(BACKEND, "find_templates_by_created_by", started_at, &result);
        result
    }

    fn delete_template_by_uuid(&self, conn: &MemoryStore, uuid: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = conn
            .lock()
            .map(|mut templates| {
                templates.remove(uuid);
            })
            .map_err(|err| {
                RepoError::storage(err, "failed to delete template").with_field("uuid", uuid)
            });
        log_outcome(BACKEND, "delete_template_by_uuid", started_at, &result);
        result
    }
}
