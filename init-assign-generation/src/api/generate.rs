use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, trace, warn};
use serde::Serialize;

use crate::config::GenerationConfig;
use crate::document::{plan_at_line, plan_document, DocumentPlan, InitializerReport, Outcome};
use crate::providers::FileSystemProvider;

/// Result of processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Whether any statements were planned for this file
    pub changed: bool,
    /// Whether the file was rewritten
    pub written: bool,
    pub reports: Vec<InitializerReport>,
    /// Set when the file itself could not be read, parsed or written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn failed(path: &Path, error: &anyhow::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            changed: false,
            written: false,
            reports: Vec::new(),
            error: Some(format!("{:#}", error)),
        }
    }

    /// Whether the file or one of its initializers failed.
    pub fn has_failures(&self) -> bool {
        self.error.is_some()
            || self
                .reports
                .iter()
                .any(|report| matches!(report.outcome, Outcome::Failed { .. }))
    }
}

/// Generate assignments for every class of every file.
///
/// Each file is independent: a file that cannot be read or written is reported
/// and the remaining files are still processed. With `write` set, changed
/// files are rewritten in place.
pub async fn process_files(
    paths: &[PathBuf],
    config: &GenerationConfig,
    write: bool,
) -> Vec<FileReport> {
    trace!("Processing {} source files", paths.len());

    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let report = match process_file(path, config, write).await {
            Ok(report) => report,
            Err(e) => {
                warn!("{}: {:#}", path.display(), e);
                FileReport::failed(path, &e)
            }
        };
        results.push(report);
    }

    let generated = results
        .iter()
        .flat_map(|file| file.reports.iter())
        .filter(|report| matches!(report.outcome, Outcome::Generated { .. }))
        .count();
    info!(
        "Generation completed: {} initializer(s) filled across {} file(s)",
        generated,
        results.len()
    );

    results
}

async fn process_file(path: &Path, config: &GenerationConfig, write: bool) -> Result<FileReport> {
    let source = FileSystemProvider::read_file(path).await?;
    let plan = plan_document(&source, config)
        .with_context(|| format!("Failed to analyze {}", path.display()))?;
    finish(path, &source, plan, write).await
}

/// Generate assignments for the initializer around 1-based `line` in one file.
pub async fn process_line(
    path: &Path,
    line: usize,
    config: &GenerationConfig,
    write: bool,
) -> Result<FileReport> {
    let source = FileSystemProvider::read_file(path).await?;
    let plan = plan_at_line(&source, line, config)
        .with_context(|| format!("Failed to generate assignments in {}", path.display()))?;
    finish(path, &source, plan, write).await
}

async fn finish(path: &Path, source: &str, plan: DocumentPlan, write: bool) -> Result<FileReport> {
    let changed = !plan.is_unchanged();
    let written = write && changed;
    if written {
        FileSystemProvider::write_file(path, &plan.apply(source)).await?;
        info!("Updated {}", path.display());
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        changed,
        written,
        reports: plan.reports,
        error: None,
    })
}
