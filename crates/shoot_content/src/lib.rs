//! Template persistence core for Shoot.
//! Owns the template record, its repository contract and storage backends.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::ContentConfig;
pub use error::{ErrorKind, RepoError, RepoResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::template::{Template, TemplateId};
pub use repo::memory_repo::{InMemoryTemplateRepository, MemoryStore};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateRepository};
pub use service::template_service::{TemplateDraft, TemplateService};
