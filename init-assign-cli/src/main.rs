//! init-assign: fill Python `__init__` methods with attribute assignments.

mod output;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use init_assign_generation::api::{load_config, process_files, process_line};
use init_assign_generation::signature::{emit, receiver_for};
use init_assign_generation::{parse_parameters, BodyPolicy, GenerationConfig, GenerationError};
use log::{debug, info};

use crate::output::{OutputFormat, SignatureOutput};

/// Exit status when at least one initializer could not be parsed.
const EXIT_PARSE_FAILURES: u8 = 2;
/// Exit status for I/O, configuration and cursor errors.
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "init-assign", version)]
#[command(about = "Generate self.x = x assignments for Python __init__ methods")]
struct Cli {
    /// Raise the log level (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "INIT_ASSIGN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Extra parameter name treated as a receiver (repeatable)
    #[arg(long = "receiver", value_name = "NAME", global = true)]
    receivers: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate assignments for every class in the given files.
    /// Nothing is modified unless --write is given.
    Generate {
        /// Python source files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Rewrite the files in place
        #[arg(long)]
        write: bool,

        /// Also fill initializers whose body already contains statements
        #[arg(long)]
        force: bool,
    },
    /// Generate assignments for the __init__ enclosing a line.
    AtLine {
        /// Python source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// 1-based line inside the initializer
        #[arg(long)]
        line: usize,

        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },
    /// Run a raw parameter list through the generator (read from stdin when omitted).
    Signature {
        /// Text between the parentheses of an __init__ definition
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },
}

/// Outcome of a command that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    ParseFailures,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(Status::Success) => ExitCode::SUCCESS,
        Ok(Status::ParseFailures) => ExitCode::from(EXIT_PARSE_FAILURES),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

async fn run(cli: Cli) -> Result<Status> {
    let config = load_config(cli.config.as_deref())
        .await?
        .with_receivers(cli.receivers);
    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Generate {
            files,
            write,
            force,
        } => {
            let config = if force {
                config.with_body_policy(BodyPolicy::Always)
            } else {
                config
            };
            run_generate(&files, &config, write, cli.format).await
        }
        Commands::AtLine { file, line, write } => {
            run_at_line(&file, line, &config, write, cli.format).await
        }
        Commands::Signature { text } => run_signature(text, &config, cli.format),
    }
}

async fn run_generate(
    files: &[PathBuf],
    config: &GenerationConfig,
    write: bool,
    format: OutputFormat,
) -> Result<Status> {
    let results = process_files(files, config, write).await;
    output::print_file_reports(&results, format)?;

    if let Some(failed) = results.iter().find(|file| file.error.is_some()) {
        anyhow::bail!(
            "Could not process {}: {}",
            failed.path.display(),
            failed.error.as_deref().unwrap_or_default()
        );
    }
    if results.iter().any(|file| file.has_failures()) {
        return Ok(Status::ParseFailures);
    }
    Ok(Status::Success)
}

async fn run_at_line(
    file: &Path,
    line: usize,
    config: &GenerationConfig,
    write: bool,
    format: OutputFormat,
) -> Result<Status> {
    let report = match process_line(file, line, config, write).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(GenerationError::Signature { .. }) = e.downcast_ref::<GenerationError>() {
                eprintln!("Error: {:#}", e);
                return Ok(Status::ParseFailures);
            }
            return Err(e);
        }
    };
    output::print_line_report(&report, format)?;
    Ok(Status::Success)
}

fn run_signature(
    text: Option<String>,
    config: &GenerationConfig,
    format: OutputFormat,
) -> Result<Status> {
    let raw = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read the parameter list from stdin")?;
            buffer
        }
    };
    info!("Parsing parameter list of {} byte(s)", raw.len());

    let parameters = match parse_parameters(&raw, &config.receiver_names) {
        Ok(parameters) => parameters,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(Status::ParseFailures);
        }
    };
    let statements = emit(&parameters, receiver_for(&parameters, config));

    output::print_signature(
        &SignatureOutput {
            parameters,
            statements,
        },
        format,
    )?;
    Ok(Status::Success)
}
