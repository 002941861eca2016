//! Rendering of reports on stdout

use anyhow::{Context, Result};
use clap::ValueEnum;
use init_assign_generation::api::FileReport;
use init_assign_generation::{GeneratedStatement, Outcome, ParameterSpec, SkipReason};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// What the `signature` command reports for one parameter list.
#[derive(Debug, Serialize)]
pub struct SignatureOutput {
    pub parameters: Vec<ParameterSpec>,
    pub statements: Vec<GeneratedStatement>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn print_file_reports(results: &[FileReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Text => {
            for file in results {
                print_file_text(file);
            }
            Ok(())
        }
    }
}

/// Cursor mode prints the statements alone so they can be pasted or piped.
pub fn print_line_report(file: &FileReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(file),
        OutputFormat::Text => {
            for report in &file.reports {
                if let Outcome::Generated { statements } = &report.outcome {
                    for statement in statements {
                        println!("{}", statement);
                    }
                }
            }
            Ok(())
        }
    }
}

pub fn print_signature(output: &SignatureOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Text => {
            for statement in &output.statements {
                println!("{}", statement);
            }
            Ok(())
        }
    }
}

fn print_file_text(file: &FileReport) {
    let status = match (&file.error, file.written) {
        (Some(error), _) => format!(" (error: {})", error),
        (None, true) => " (written)".to_string(),
        (None, false) => String::new(),
    };
    println!("{}{}", file.path.display(), status);

    for report in &file.reports {
        println!(
            "  {} (line {}): {}",
            report.class_name,
            report.line,
            describe(&report.outcome)
        );
        if let Outcome::Generated { statements } = &report.outcome {
            for statement in statements {
                println!("      {}", statement);
            }
        }
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Generated { statements } => {
            format!("generated {} assignment(s)", statements.len())
        }
        Outcome::NothingToGenerate => "nothing to generate".to_string(),
        Outcome::NoInitializer => "no __init__".to_string(),
        Outcome::Skipped { skip } => match skip {
            SkipReason::NonTrivialBody => "skipped, body already has statements".to_string(),
            SkipReason::InlineBody => "skipped, body is on the header line".to_string(),
            SkipReason::MultipleInitializers { count } => {
                format!("skipped, __init__ is defined {} times", count)
            }
        },
        Outcome::Failed { diagnostic } => format!("failed: {}", diagnostic),
    }
}
