//! Template use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for upstream callers.
//! - Delegate persistence to any `TemplateRepository` backend.
//!
//! # Invariants
//! - New templates get a fresh v4 uuid and the requesting user as owner.
//! - Updates replace content fields only; ownership never changes.
//! - Service layer remains storage-agnostic.

use crate::error::{ErrorKind, RepoError, RepoResult};
use crate::model::template::Template;
use crate::repo::template_repo::TemplateRepository;
use log::info;
use uuid::Uuid;

/// Author-editable content of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub subject: String,
    /// Blank values are stored as `None`.
    pub preview_text: Option<String>,
    pub html_body: String,
}

impl TemplateDraft {
    fn apply_to(&self, template: &mut Template) {
        template.name = self.name.clone();
        template.subject = self.subject.clone();
        template.preview_text = normalize_preview_text(self.preview_text.as_deref());
        template.html_body = self.html_body.clone();
    }
}

/// Use-case service wrapper for template operations.
pub struct TemplateService<R: TemplateRepository> {
    repo: R,
}

impl<R: TemplateRepository> TemplateService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists a new template owned by `created_by`.
    ///
    /// Returns the stored value, timestamps included.
    pub fn create_template(
        &self,
        conn: &R::Conn,
        created_by: &str,
        draft: &TemplateDraft,
    ) -> RepoResult<Template> {
        let mut template = Template {
            uuid: Uuid::new_v4().to_string(),
            created_by: created_by.to_string(),
            ..Template::default()
        };
        draft.apply_to(&mut template);
        self.repo.add_template(conn, &mut template)?;

        info!(
            "event=template_create module=service status=ok template_uuid={}",
            template.uuid
        );
        Ok(template)
    }

    /// Replaces the content fields of an existing template.
    ///
    /// # Errors
    /// - `ErrorKind::NotFound` when no template has `uuid`.
    pub fn update_template(
        &self,
        conn: &R::Conn,
        uuid: &str,
        draft: &TemplateDraft,
    ) -> RepoResult<Template> {
        let mut template = self.repo.get_template_by_uuid(conn, uuid)?;
        if template.is_zero() {
            return Err(
                RepoError::new(ErrorKind::NotFound, "template not found").with_field("uuid", uuid)
            );
        }

        draft.apply_to(&mut template);
        self.repo.add_template(conn, &mut template)?;
        Ok(template)
    }

    /// Gets one template, mapping the repository's zero value to `None`.
    pub fn get_template(&self, conn: &R::Conn, uuid: &str) -> RepoResult<Option<Template>> {
        let template = self.repo.get_template_by_uuid(conn, uuid)?;
        Ok((!template.is_zero()).then_some(template))
    }

    /// Lists the templates owned by `created_by`, most recently updated first.
    pub fn list_templates(&self, conn: &R::Conn, created_by: &str) -> RepoResult<Vec<Template>> {
        self.repo.find_templates_by_created_by(conn, created_by)
    }

    pub fn delete_template(&self, conn: &R::Conn, uuid: &str) -> RepoResult<()> {
        self.repo.delete_template_by_uuid(conn, uuid)?;
        info!("event=template_delete module=service status=ok template_uuid={uuid}");
        Ok(())
    }
}

fn normalize_preview_text(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
