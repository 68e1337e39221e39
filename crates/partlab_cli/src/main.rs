//! `partlab` command line entry point.
//!
//! # Responsibility
//! - Map subcommands onto the part and test services, one unit of work per
//!   invocation.
//! - Print results as JSON on stdout; failures go to stderr with a non-zero
//!   exit code.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use log::info;
use partlab_core::{
    core_version, init_logging, ChangePartTimestampService, CreatePartService, CreateTestService,
    DatabaseApp, DeletePartService, DeleteTestService, LogSettings, PartChangeTimestamp,
    PartRegistration, RepoError, ServiceError, Settings, ShowPartService, ShowTestService,
    StoreUnitOfWork, TestData, TestRegistration, TestUpdate, UpdateTestService,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_DATABASE_FILE: &str = "partlab.db";

#[derive(Parser, Debug)]
#[command(name = "partlab", version, about = "Record parts and the tests run against them")]
struct Cli {
    /// SQLite database file [default: ./partlab.db, or PARTLAB_DATABASE_PATH]
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Directory for rolling log files; stderr when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage parts
    #[command(subcommand)]
    Part(PartCommand),
    /// Manage test runs
    #[command(subcommand)]
    Test(TestCommand),
}

#[derive(Subcommand, Debug)]
enum PartCommand {
    /// Register a new part
    Create {
        #[arg(long)]
        name: String,
    },
    /// Show one part
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// List parts in insertion order
    List(Page),
    /// Delete a part and every test recorded against it
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Set a part's modification timestamp (now when omitted)
    Touch {
        #[arg(long)]
        id: Uuid,
        #[arg(long, value_parser = parse_timestamp)]
        timestamp: Option<DateTime<Utc>>,
    },
}

#[derive(Subcommand, Debug)]
enum TestCommand {
    /// Record a test run against an existing part
    Create {
        #[arg(long)]
        part_id: Uuid,
        #[arg(long, required = true, action = clap::ArgAction::Set)]
        successful: bool,
        /// JSON object with free-form results
        #[arg(long, value_parser = parse_data)]
        data: Option<TestData>,
    },
    /// Show one test run
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// List test runs in insertion order
    List(Page),
    /// Change the given fields of a test run
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        successful: Option<bool>,
        #[arg(long, value_parser = parse_data)]
        data: Option<TestData>,
        #[arg(long, value_parser = parse_timestamp)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Delete a test run
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct Page {
    #[arg(long, default_value_t = 10)]
    limit: u32,
    #[arg(long, default_value_t = 0)]
    skip: u32,
}

#[derive(Serialize)]
struct Deleted {
    deleted: Uuid,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = Settings::from_env().context("invalid PARTLAB_* environment")?;
    let settings = resolve_settings(&cli, env)?;
    init_logging(&settings.log).context("failed to initialise logging")?;

    let app = DatabaseApp::new(settings);
    let database = app
        .settings()
        .database_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_DATABASE_FILE));
    info!(
        "event=cli_start module=cli status=ok version={} database={}",
        core_version(),
        database.display()
    );

    let mut conn = app.connect().context("failed to open database")?;
    let uow = StoreUnitOfWork::for_connection(&mut conn);

    match cli.command {
        Command::Part(command) => run_part(command, uow),
        Command::Test(command) => run_test(command, uow),
    }
}

fn run_part(command: PartCommand, uow: StoreUnitOfWork<'_>) -> Result<()> {
    match command {
        PartCommand::Create { name } => {
            let part = CreatePartService::new(uow)
                .create_part(&PartRegistration { name })
                .map_err(describe)?;
            print_json(&part)
        }
        PartCommand::Show { id } => {
            let part = ShowPartService::new(uow).show_part(id).map_err(describe)?;
            print_json(&part)
        }
        PartCommand::List(page) => {
            let parts = ShowPartService::new(uow)
                .show_parts(page.limit, page.skip)
                .map_err(describe)?;
            print_json(&parts)
        }
        PartCommand::Delete { id } => {
            DeletePartService::new(uow).delete_part(id).map_err(describe)?;
            print_json(&Deleted { deleted: id })
        }
        PartCommand::Touch { id, timestamp } => {
            let request = PartChangeTimestamp {
                id,
                modified_timestamp: timestamp.unwrap_or_else(Utc::now),
            };
            let part = ChangePartTimestampService::new(uow)
                .change_timestamp(&request)
                .map_err(describe)?;
            print_json(&part)
        }
    }
}

fn run_test(command: TestCommand, uow: StoreUnitOfWork<'_>) -> Result<()> {
    match command {
        TestCommand::Create {
            part_id,
            successful,
            data,
        } => {
            let request = TestRegistration {
                part_id,
                successful,
                data,
            };
            let test = CreateTestService::new(uow)
                .create_test(&request)
                .map_err(describe)?;
            print_json(&test)
        }
        TestCommand::Show { id } => {
            let test = ShowTestService::new(uow).show_test(id).map_err(describe)?;
            print_json(&test)
        }
        TestCommand::List(page) => {
            let tests = ShowTestService::new(uow)
                .show_tests(page.limit, page.skip)
                .map_err(describe)?;
            print_json(&tests)
        }
        TestCommand::Update {
            id,
            successful,
            data,
            timestamp,
        } => {
            let update = TestUpdate {
                id,
                successful,
                data,
                timestamp,
            };
            let test = UpdateTestService::new(uow)
                .update_data(&update)
                .map_err(describe)?;
            print_json(&test)
        }
        TestCommand::Delete { id } => {
            DeleteTestService::new(uow).delete_test(id).map_err(describe)?;
            print_json(&Deleted { deleted: id })
        }
    }
}

/// Flags win over the environment. Without either, the database is
/// [`DEFAULT_DATABASE_FILE`] in the working directory so that separate
/// invocations see the same rows.
fn resolve_settings(cli: &Cli, env: Settings) -> Result<Settings> {
    let mut settings = env;
    if let Some(path) = &cli.database {
        settings = settings.with_database_path(path);
    }
    if settings.database_path.is_none() {
        settings = settings.with_database_path(DEFAULT_DATABASE_FILE);
    }
    if cli.log_level.is_some() || cli.log_dir.is_some() {
        let level = cli.log_level.as_deref().unwrap_or(settings.log.level);
        let dir = match &cli.log_dir {
            Some(dir) if dir.is_relative() => Some(
                std::env::current_dir()
                    .context("failed to resolve current directory")?
                    .join(dir),
            ),
            Some(dir) => Some(dir.clone()),
            None => settings.log.dir.clone(),
        };
        settings.log = LogSettings::new(level, dir.as_deref())?;
    }
    Ok(settings)
}

fn describe(err: ServiceError) -> anyhow::Error {
    match err {
        ServiceError::PartNotFound(id)
        | ServiceError::Repo(RepoError::EntityNotFound { entity: "part", id }) => {
            anyhow!("Part not found: {id}")
        }
        ServiceError::Repo(RepoError::EntityNotFound { entity: "test", id }) => {
            anyhow!("Test not found: {id}")
        }
        other => anyhow::Error::new(other),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC3339 timestamp: {err}"))
}

fn parse_data(raw: &str) -> Result<TestData, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(err) => Err(format!("invalid JSON: {err}")),
    }
}
