//! Command-line entry point over the template store.
//!
//! # Responsibility
//! - Wire config, logging and a SQLite connection for one invocation.
//! - Run one template use case per command inside a single transaction.
//! - Print results as pretty JSON on stdout.

use clap::{Args, Parser, Subcommand};
use log::error;
use shoot_content::db::{open_db, run_in_transaction, DbError};
use shoot_content::{
    init_logging, ContentConfig, RepoError, SqliteTemplateRepository, TemplateDraft,
    TemplateService,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shoot")]
#[command(about = "Manage stored content templates", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file (overrides SHOOT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides SHOOT_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files (overrides SHOOT_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a template owned by a user
    Add {
        /// Owning user id
        #[arg(long)]
        created_by: String,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Replace the content of an existing template
    Update {
        uuid: String,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Show one template
    Get { uuid: String },
    /// List a user's templates, most recently updated first
    List { created_by: String },
    /// Delete a template (missing templates are ignored)
    Delete { uuid: String },
}

#[derive(Args)]
struct ContentArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long)]
    preview_text: Option<String>,
    #[arg(long, default_value = "")]
    html_body: String,
}

impl From<ContentArgs> for TemplateDraft {
    fn from(args: ContentArgs) -> Self {
        Self {
            name: args.name,
            subject: args.subject,
            preview_text: args.preview_text,
            html_body: args.html_body,
        }
    }
}

#[derive(Debug)]
enum CliError {
    Repo(RepoError),
    Output(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to render output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("logging disabled: {err}");
    }

    match run(cli.command, &config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> ContentConfig {
    let mut config = ContentConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config
}

fn run(command: Command, config: &ContentConfig) -> Result<String, CliError> {
    let mut conn = open_db(&config.db_path)?;
    let service = TemplateService::new(SqliteTemplateRepository::new());

    let output = run_in_transaction(&mut conn, |tx| -> Result<serde_json::Value, CliError> {
        let value = match command {
            Command::Add {
                created_by,
                content,
            } => {
                let draft = TemplateDraft::from(content);
                to_json(&service.create_template(tx, &created_by, &draft)?)?
            }
            Command::Update { uuid, content } => {
                let draft = TemplateDraft::from(content);
                to_json(&service.update_template(tx, &uuid, &draft)?)?
            }
            Command::Get { uuid } => to_json(&service.get_template(tx, &uuid)?)?,
            Command::List { created_by } => {
                to_json(&service.list_templates(tx, &created_by)?)?
            }
            Command::Delete { uuid } => {
                service.delete_template(tx, &uuid)?;
                serde_json::json!({ "deleted": uuid })
            }
        };
        Ok(value)
    })?;

    Ok(serde_json::to_string_pretty(&output)?)
}

fn to_json(value: &impl serde::Serialize) -> Result<serde_json::Value, CliError> {
    Ok(serde_json::to_value(value)?)
}
