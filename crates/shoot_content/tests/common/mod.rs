//! Behavioral checks shared by every `TemplateRepository` backend.

#![allow(dead_code)]

use shoot_content::{Template, TemplateRepository};

pub fn template(uuid: &str, created_by: &str, name: &str) -> Template {
    Template {
        uuid: uuid.to_string(),
        name: name.to_string(),
        subject: format!("{name} subject"),
        preview_text: Some(format!("{name} preview")),
        html_body: format!("<p>{name}</p>"),
        created_by: created_by.to_string(),
        ..Template::default()
    }
}

pub fn uuids(templates: &[Template]) -> Vec<&str> {
    templates
        .iter()
        .map(|template| template.uuid.as_str())
        .collect()
}

pub fn add_then_get_returns_stored_value<R: TemplateRepository>(repo: &R, conn: &R::Conn) {
    let mut original = template("t-round", "u1", "welcome");
    original.preview_text = None;
    repo.add_template(conn, &mut original).unwrap();

    assert!(original.created_at > 0);
    assert!(original.updated_at >= original.created_at);

    let loaded = repo.get_template_by_uuid(conn, "t-round").unwrap();
    assert_eq!(loaded, original);
}

pub fn add_overwrites_existing_uuid<R: TemplateRepository>(repo: &R, conn: &R::Conn) {
    let mut first = template("t-upsert", "u1", "draft");
    repo.add_template(conn, &mut first).unwrap();

    let mut second = first.clone();
    second.subject = "final subject".to_string();
    second.html_body = "<h1>final</h1>".to_string();
    repo.add_template(conn, &mut second).unwrap();

    let loaded = repo.get_template_by_uuid(conn, "t-upsert").unwrap();
    assert_eq!(loaded, second);
    assert_eq!(loaded.subject, "final subject");
    assert_eq!(loaded.created_at, first.created_at);
    assert!(loaded.updated_at > first.updated_at);

    let owned = repo.find_templates_by_created_by(conn, "u1").unwrap();
    assert_eq!(uuids(&owned), vec!["t-upsert"]);
}

pub fn add_never_changes_owner<R: TemplateRepository>(repo: &R, conn: &R::Conn) {
    let mut original = template("t-owner", "u1", "owned");
    repo.add_template(conn, &mut original).unwrap();

    let mut hijack = original.clone();
    hijack.created_by = "u2".to_string();
    hijack.created_at = 1;
    repo.add_template(conn, &mut hijack).unwrap();

    assert_eq!(hijack.created_by, "u1");
    assert_eq!(hijack.created_at, original.created_at);
    let loaded = repo.get_template_by_uuid(conn, "t-owner").unwrap();
    assert_eq!(loaded.created_by, "u1");
    assert!(repo
        .find_templates_by_created_by(conn, "u2")
        .unwrap()
        .is_empty());
}

pub fn get_missing_uuid_returns_zero_value<R: TemplateRepository>(repo: &R, conn: &R::Conn) {
    let loaded = repo.get_template_by_uuid(conn, "nonexistent-uuid").unwrap();
    assert_eq!(loaded, Template::default());
    assert!(loaded.is_zero());
}

pub fn delete_is_idempotent<R: TemplateRepository>(repo: &R, conn: &R::Conn) {
    repo.delete_template_by_uuid(conn, "nonexistent-uuid").unwrap();

    let mut existing = template("t-delete", "u1", "doomed");
    repo.add_template(conn, &mut existing).unwrap();

    repo.delete_template_by_uuid(conn, "t-delete").unwrap();
    repo.delete_template_by_uuid(conn, "t-delete").unwrap();

    assert!(repo
        .get_template_by_uuid(conn, "t-delete")
        .unwrap()
        .is_zero());
}

pub fn owner_listing_is_newest_first_isolated_and_tracks_deletes<R: TemplateRepository>(
    repo: &R,
    conn: &R::Conn,
) {
    assert!(repo
        .find_templates_by_created_by(conn, "u1")
        .unwrap()
        .is_empty());

    let mut a = template("t-a", "u1", "alpha");
    let mut b = template("t-b", "u1", "beta");
    let mut other = template("t-other", "u2", "other");
    repo.add_template(conn, &mut a).unwrap();
    repo.add_template(conn, &mut b).unwrap();
    repo.add_template(conn, &mut other).unwrap();

    let owned = repo.find_templates_by_created_by(conn, "u1").unwrap();
    assert_eq!(uuids(&owned), vec!["t-b", "t-a"]);
    assert_eq!(owned[0], b);

    let foreign = repo.find_templates_by_created_by(conn, "u2").unwrap();
    assert_eq!(uuids(&foreign), vec!["t-other"]);

    repo.delete_template_by_uuid(conn, "t-b").unwrap();
    let owned = repo.find_templates_by_created_by(conn, "u1").unwrap();
    assert_eq!(uuids(&owned), vec!["t-a"]);
}

pub fn rewriting_older_template_moves_it_to_front<R: TemplateRepository>(
    repo: &R,
    conn: &R::Conn,
) {
    let mut a = template("t-old", "u3", "old");
    let mut b = template("t-new", "u3", "new");
    repo.add_template(conn, &mut a).unwrap();
    repo.add_template(conn, &mut b).unwrap();

    a.name = "old, renamed".to_string();
    repo.add_template(conn, &mut a).unwrap();

    let owned = repo.find_templates_by_created_by(conn, "u3").unwrap();
    assert_eq!(uuids(&owned), vec!["t-old", "t-new"]);
    assert_eq!(owned[0].name, "old, renamed");
}

pub fn back_to_back_writes_list_newest_first<R: TemplateRepository>(repo: &R, conn: &R::Conn) {
    for round in 0..50 {
        let owner = format!("burst-{round}");
        let mut older = template(&format!("{round}-z"), &owner, "older");
        let mut newer = template(&format!("{round}-a"), &owner, "newer");
        repo.add_template(conn, &mut older).unwrap();
        repo.add_template(conn, &mut newer).unwrap();

        assert!(newer.updated_at > older.updated_at);
        let owned = repo.find_templates_by_created_by(conn, &owner).unwrap();
        assert_eq!(
            uuids(&owned),
            vec![newer.uuid.as_str(), older.uuid.as_str()],
            "round {round}"
        );
    }
}
