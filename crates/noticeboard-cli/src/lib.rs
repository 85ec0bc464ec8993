// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod actions;
mod commands;
mod config;

use clap::{error::ErrorKind, ArgAction, Parser, Subcommand};
use commands::{
    ArchiveArgs, AudienceCli, ClassCommand, DraftCommand, LoginKindCli, PageArgs, UserCommand,
};
use noticeboard_core::{
    ClassId, DocumentId, ExitCode, MachineError, UserId, ENV_NOTICEBOARD_LOG_LEVEL,
};
use noticeboard_query::{QueryError, QueryErrorCode};
use noticeboard_store::StoreError;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::EnvFilter;

const NOTICEBOARD_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "noticeboard", version)]
#[command(about = "School circular distribution and read-receipt tracker")]
#[command(help_template = NOTICEBOARD_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  NOTICEBOARD_DB            SQLite database path\n  NOTICEBOARD_SCHOOL_YEAR   School year override (YYYY/YYYY)\n  NOTICEBOARD_LOG_LEVEL     Log filter directive"
)]
struct Cli {
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true)]
    school_year: Option<String>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and store the school year.
    Init,
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    Class {
        #[command(subcommand)]
        command: ClassCommand,
    },
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },
    Publish {
        document: DocumentId,
    },
    Redistribute {
        document: DocumentId,
    },
    NextNumber,
    CheckNumber {
        number: u32,
        #[arg(long)]
        exclude: Option<DocumentId>,
    },
    /// Confirm a circular on behalf of a recipient.
    Ack {
        #[arg(long)]
        document: DocumentId,
        #[arg(long)]
        user: UserId,
    },
    /// Mark circulars as read to a class by its representative.
    AckClass {
        #[arg(long)]
        class: ClassId,
        #[arg(long)]
        document: Option<DocumentId>,
    },
    MarkRead {
        #[arg(long)]
        document: DocumentId,
        #[arg(long)]
        user: UserId,
    },
    Stats {
        document: DocumentId,
    },
    Pending {
        document: DocumentId,
    },
    Unread {
        #[arg(long, conflicts_with = "user", required_unless_present = "user")]
        class: Option<ClassId>,
        #[arg(long)]
        user: Option<UserId>,
    },
    List {
        #[arg(long)]
        user: UserId,
        #[arg(long, value_enum, default_value_t = AudienceCli::All)]
        audience: AudienceCli,
        /// YYYY-MM
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Search {
        #[arg(long)]
        from: Option<chrono::NaiveDate>,
        #[arg(long)]
        to: Option<chrono::NaiveDate>,
        #[arg(long)]
        subject: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Drafts,
    Archive {
        #[command(flatten)]
        args: ArchiveArgs,
    },
    /// Open a session for an already verified email address.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = LoginKindCli::Password)]
        kind: LoginKindCli,
    },
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    fn validation(message: String) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_error", &message),
        }
    }

    fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        let exit_code = match err.code {
            QueryErrorCode::Validation
            | QueryErrorCode::NotFound
            | QueryErrorCode::Conflict
            | QueryErrorCode::Unauthorized => ExitCode::Validation,
            QueryErrorCode::Io | QueryErrorCode::Store => ExitCode::DependencyFailure,
            _ => ExitCode::Internal,
        };
        Self {
            exit_code,
            machine: MachineError::new(err.code.as_str(), &err.message),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("store", &err.0),
        }
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    init_tracing(cli.verbose);
    let output_mode = OutputMode { json: cli.json };
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    let db = config::resolve_db_path(cli.db);
    let payload = actions::dispatch(command, &db, cli.school_year.as_deref())?;
    emit_ok(output_mode, &payload)
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(ENV_NOTICEBOARD_LOG_LEVEL)
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn emit_ok(output_mode: OutputMode, payload: &Value) -> Result<(), CliError> {
    let text = if output_mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    }
    .map_err(|e| CliError::internal(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
