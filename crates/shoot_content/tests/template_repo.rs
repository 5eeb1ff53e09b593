mod common;

use common::template;
use rusqlite::Connection;
use shoot_content::db::{open_db, open_db_in_memory, run_in_transaction};
use shoot_content::{
    ErrorKind, InMemoryTemplateRepository, MemoryStore, RepoError, SqliteTemplateRepository,
    TemplateRepository,
};
use std::error::Error;

fn sqlite() -> (SqliteTemplateRepository, Connection) {
    (SqliteTemplateRepository::new(), open_db_in_memory().unwrap())
}

fn memory() -> (InMemoryTemplateRepository, MemoryStore) {
    (InMemoryTemplateRepository::new(), MemoryStore::new())
}

macro_rules! backend_suite {
    ($backend:ident) => {
        mod $backend {
            use super::common;

            #[test]
            fn add_then_get_returns_stored_value() {
                let (repo, conn) = super::$backend();
                common::add_then_get_returns_stored_value(&repo, &conn);
            }

            #[test]
            fn add_overwrites_existing_uuid() {
                let (repo, conn) = super::$backend();
                common::add_overwrites_existing_uuid(&repo, &conn);
            }

            #[test]
            fn add_never_changes_owner() {
                let (repo, conn) = super::$backend();
                common::add_never_changes_owner(&repo, &conn);
            }

            #[test]
            fn get_missing_uuid_returns_zero_value() {
                let (repo, conn) = super::$backend();
                common::get_missing_uuid_returns_zero_value(&repo, &conn);
            }

            #[test]
            fn delete_is_idempotent() {
                let (repo, conn) = super::$backend();
                common::delete_is_idempotent(&repo, &conn);
            }

            #[test]
            fn owner_listing_is_newest_first_isolated_and_tracks_deletes() {
                let (repo, conn) = super::$backend();
                common::owner_listing_is_newest_first_isolated_and_tracks_deletes(&repo, &conn);
            }

            #[test]
            fn back_to_back_writes_list_newest_first() {
                let (repo, conn) = super::$backend();
                common::back_to_back_writes_list_newest_first(&repo, &conn);
            }

            #[test]
            fn rewriting_older_template_moves_it_to_front() {
                let (repo, conn) = super::$backend();
                common::rewriting_older_template_moves_it_to_front(&repo, &conn);
            }
        }
    };
}

backend_suite!(sqlite);
backend_suite!(memory);

#[test]
fn add_rejects_empty_identity_before_touching_storage() {
    let (repo, conn) = sqlite();

    let mut no_uuid = template("", "u1", "nameless");
    let err = repo.add_template(&conn, &mut no_uuid).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(no_uuid.updated_at, 0);

    let mut no_owner = template("t-1", "", "orphan");
    let err = repo.add_template(&conn, &mut no_owner).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.field("uuid"), Some("t-1"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM templates;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn failed_add_leaves_caller_value_untouched() {
    let (repo, conn) = sqlite();
    conn.execute_batch("DROP TABLE templates;").unwrap();

    let mut value = template("t-1", "u1", "lost");
    let before = value.clone();
    repo.add_template(&conn, &mut value).unwrap_err();
    assert_eq!(value, before);
    assert_eq!(value.updated_at, 0);
}

#[test]
fn backend_failures_are_classified_with_operation_context() {
    let (repo, conn) = sqlite();
    conn.execute_batch("DROP TABLE templates;").unwrap();

    let mut value = template("t-1", "u1", "lost");
    let err = repo.add_template(&conn, &mut value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.message(), "failed to add template");
    assert!(err.fields().is_empty());
    assert!(err.source().is_some());

    let err = repo.get_template_by_uuid(&conn, "t-1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.message(), "failed to query template");
    assert_eq!(err.field("uuid"), Some("t-1"));

    let err = repo.find_templates_by_created_by(&conn, "u1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.message(), "failed to query templates");
    assert_eq!(err.field("createdBy"), Some("u1"));
    assert!(err.to_string().starts_with("failed to query templates (createdBy=u1): "));

    let err = repo.delete_template_by_uuid(&conn, "t-1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.message(), "failed to delete template");
    assert_eq!(err.field("uuid"), Some("t-1"));
}

#[test]
fn corrupt_rows_surface_as_invalid_data() {
    let (repo, conn) = sqlite();
    conn.execute(
        "INSERT INTO templates (uuid, created_by, created_at, updated_at)
         VALUES ('t-bad', 'u1', 'not a number', 1);",
        [],
    )
    .unwrap();

    let err = repo.get_template_by_uuid(&conn, "t-bad").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(err.field("uuid"), Some("t-bad"));
}

#[test]
fn calls_made_inside_transaction_share_it_and_roll_back_on_error() {
    let repo = SqliteTemplateRepository::new();
    let mut conn = open_db_in_memory().unwrap();

    let result: Result<(), RepoError> = run_in_transaction(&mut conn, |tx| {
        let mut value = template("t-tx", "u1", "pending");
        repo.add_template(tx, &mut value)?;
        let seen = repo.get_template_by_uuid(tx, "t-tx")?;
        assert_eq!(seen, value);
        Err(RepoError::new(ErrorKind::InvalidInput, "abort unit of work"))
    });
    assert!(result.is_err());
    assert!(repo.get_template_by_uuid(&conn, "t-tx").unwrap().is_zero());

    run_in_transaction(&mut conn, |tx| -> Result<(), RepoError> {
        let mut first = template("t-1", "u1", "first");
        let mut second = template("t-2", "u1", "second");
        repo.add_template(tx, &mut first)?;
        repo.add_template(tx, &mut second)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(
        repo.find_templates_by_created_by(&conn, "u1").unwrap().len(),
        2
    );
}

#[test]
fn templates_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shoot.db");
    let repo = SqliteTemplateRepository::new();

    let mut stored = template("t-durable", "u1", "durable");
    {
        let conn = open_db(&path).unwrap();
        repo.add_template(&conn, &mut stored).unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(repo.get_template_by_uuid(&conn, "t-durable").unwrap(), stored);
}
