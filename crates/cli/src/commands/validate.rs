//! `validate` command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use contracts::{DeclarationBatch, SchemaViolation};
use doc_loader::DocumentLoader;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::{ensure_exists, CliError};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<ViolationEntry>,
}

#[derive(Serialize)]
struct FileReport {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Violation as reported, plus its human-readable message
#[derive(Serialize)]
struct ViolationEntry {
    #[serde(flatten)]
    violation: SchemaViolation,
    message: String,
}

impl From<&SchemaViolation> for ViolationEntry {
    fn from(violation: &SchemaViolation) -> Self {
        Self {
            violation: violation.clone(),
            message: violation.reason.to_string(),
        }
    }
}

impl ValidationReport {
    fn problem_count(&self) -> usize {
        self.violations.len() + self.files.iter().filter(|f| f.error.is_some()).count()
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(files = args.files.len(), "Validating declaration documents");

    let report = validate_files(&args.files);

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_report(&report);
    }

    if report.valid {
        Ok(())
    } else {
        Err(CliError::validation_failed(report.problem_count()).into())
    }
}

fn validate_files(paths: &[PathBuf]) -> ValidationReport {
    let mut batch = DeclarationBatch::default();
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        match parse_file(path) {
            Ok(document) => {
                files.push(FileReport {
                    path: path.display().to_string(),
                    namespace: Some(document.namespace.to_string()),
                    error: None,
                });
                batch.push(document);
            }
            Err(e) => files.push(FileReport {
                path: path.display().to_string(),
                namespace: None,
                error: Some(e.to_string()),
            }),
        }
    }

    // A single document keeps unprefixed paths
    let outcome = if batch.len() == 1 {
        batch.iter().try_for_each(interop_engine::validate)
    } else {
        interop_engine::validate_batch(&batch)
    };

    let violations: Vec<ViolationEntry> = match &outcome {
        Ok(()) => Vec::new(),
        Err(errors) => errors.violations().iter().map(ViolationEntry::from).collect(),
    };

    ValidationReport {
        valid: violations.is_empty() && files.iter().all(|f| f.error.is_none()),
        files,
        violations,
    }
}

fn parse_file(path: &Path) -> Result<contracts::DeclarationDocument, CliError> {
    ensure_exists(path)?;
    Ok(DocumentLoader::parse_from_path(path)?)
}

fn print_validation_report(report: &ValidationReport) {
    for file in &report.files {
        match (&file.namespace, &file.error) {
            (_, Some(error)) => println!("✗ {}: {}", file.path, error),
            (Some(namespace), None) => println!("  {} ({})", file.path, namespace),
            (None, None) => println!("  {}", file.path),
        }
    }

    if report.valid {
        println!("\n✓ All documents are valid");
        return;
    }

    if !report.violations.is_empty() {
        println!("\n✗ {} violation(s):", report.violations.len());
        for violation in &report.violations {
            println!("  - {}: {}", violation.violation.path, violation.message);
        }
    }
}
