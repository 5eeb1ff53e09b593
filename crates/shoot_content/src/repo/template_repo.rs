//! Template repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/get/find/delete over the `templates` table.
//! - Classify SQLite failures into `RepoError` with per-operation context.
//!
//! # Invariants
//! - `add_template` upserts; an existing row keeps its `created_by` and
//!   `created_at`.
//! - Owner listings are ordered by `updated_at DESC, uuid ASC`.
//! - The repository runs on whatever handle it is given, so calls made with
//!   a `Transaction` join that transaction.

use crate::db::DbError;
use crate::error::{ErrorKind, RepoError, RepoResult};
use crate::model::template::Template;
use crate::repo::{ensure_writable, log_outcome, stamped_for_write};
use rusqlite::{params, Connection, Row};
use std::time::Instant;

const BACKEND: &str = "sqlite";

const TEMPLATE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    subject,
    preview_text,
    html_body,
    created_by,
    created_at,
    updated_at
FROM templates";

/// Repository interface for template persistence.
///
/// `Conn` is the handle for the caller's current unit of work. Every call
/// resolves storage through it and through nothing else.
pub trait TemplateRepository {
    type Conn: ?Sized;

    /// Inserts or overwrites `template` by uuid.
    ///
    /// On success the passed value is replaced by the stored row: fresh
    /// `updated_at`, and the row's `created_by`/`created_at`. On failure it
    /// is left untouched.
    fn add_template(&self, conn: &Self::Conn, template: &mut Template) -> RepoResult<()>;

    /// Returns the template with `uuid`, or `Template::default()` on a miss.
    fn get_template_by_uuid(&self, conn: &Self::Conn, uuid: &str) -> RepoResult<Template>;

    /// Returns all templates owned by `user_uuid`, newest update first.
    fn find_templates_by_created_by(
        &self,
        conn: &Self::Conn,
        user_uuid: &str,
    ) -> RepoResult<Vec<Template>>;

    /// Deletes the template with `uuid`. Missing rows are not an error.
    fn delete_template_by_uuid(&self, conn: &Self::Conn, uuid: &str) -> RepoResult<()>;
}

/// SQLite-backed template repository.
///
/// Stateless: pass a `Connection`, or a `Transaction` through deref.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteTemplateRepository;

impl SqliteTemplateRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRepository for SqliteTemplateRepository {
    type Conn = Connection;

    fn add_template(&self, conn: &Connection, template: &mut Template) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = ensure_writable(template).and_then(|()| {
            let mut stamped = stamped_for_write(template);
            let (created_by, created_at) = upsert_template(conn, &stamped)
                .map_err(|err| wrap_sqlite(err, "failed to add template"))?;
            stamped.created_by = created_by;
            stamped.created_at = created_at;
            *template = stamped;
            Ok(())
        });
        log_outcome(BACKEND, "add_template", started_at, &result);
        result
    }

    fn get_template_by_uuid(&self, conn: &Connection, uuid: &str) -> RepoResult<Template> {
        let started_at = Instant::now();
        let result = select_template(conn, uuid)
            .map_err(|err| wrap_sqlite(err, "failed to query template").with_field("uuid", uuid));
        log_outcome(BACKEND, "get_template_by_uuid", started_at, &result);
        result
    }

    fn find_templates_by_created_by(
        &self,
        conn: &Connection,
        user_uuid: &str,
    ) -> RepoResult<Vec<Template>> {
        let started_at = Instant::now();
        let result = select_templates_by_owner(conn, user_uuid).map_err(|err| {
            wrap_sqlite(err, "failed to query templates").with_field("createdBy", user_uuid)
        });
        log_outcome(BACKEND, "find_templates_by_created_by", started_at, &result);
        result
    }

    fn delete_template_by_uuid(&self, conn: &Connection, uuid: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = conn
            .execute("DELETE FROM templates WHERE uuid = ?1;", [uuid])
            .map(|_| ())
            .map_err(|err| wrap_sqlite(err, "failed to delete template").with_field("uuid", uuid));
        log_outcome(BACKEND, "delete_template_by_uuid", started_at, &result);
        result
    }
}

fn upsert_template(conn: &Connection, template: &Template) -> rusqlite::Result<(String, i64)> {
    conn.query_row(
        "INSERT INTO templates (
            uuid,
            name,
            subject,
            preview_text,
            html_body,
            created_by,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(uuid) DO UPDATE SET
            name = excluded.name,
            subject = excluded.subject,
            preview_text = excluded.preview_text,
            html_body = excluded.html_body,
            updated_at = excluded.updated_at
        RETURNING created_by, created_at;",
        params![
            template.uuid.as_str(),
            template.name.as_str(),
            template.subject.as_str(),
            template.preview_text.as_deref(),
            template.html_body.as_str(),
            template.created_by.as_str(),
            template.created_at,
            template.updated_at,
        ],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}

fn select_template(conn: &Connection, uuid: &str) -> rusqlite::Result<Template> {
    let mut stmt = conn.prepare(&format!("{TEMPLATE_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([uuid])?;
    if let Some(row) = rows.next()? {
        return parse_template_row(row);
    }

    Ok(Template::default())
}

fn select_templates_by_owner(
    conn: &Connection,
    user_uuid: &str,
) -> rusqlite::Result<Vec<Template>> {
    let mut stmt = conn.prepare(&format!(
        "{TEMPLATE_SELECT_SQL}
         WHERE created_by = ?1
         ORDER BY updated_at DESC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([user_uuid])?;
    let mut templates = Vec::new();
    while let Some(row) = rows.next()? {
        templates.push(parse_template_row(row)?);
    }
    Ok(templates)
}

fn parse_template_row(row: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        subject: row.get("subject")?,
        preview_text: row.get("preview_text")?,
        html_body: row.get("html_body")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Row decode failures mean corrupt persisted data, everything else is the
/// backend failing.
fn wrap_sqlite(err: rusqlite::Error, message: &'static str) -> RepoError {
    let kind = match err {
        rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => ErrorKind::InvalidData,
        _ => ErrorKind::Storage,
    };
    RepoError::new(kind, message).with_source(DbError::Sqlite(err))
}
