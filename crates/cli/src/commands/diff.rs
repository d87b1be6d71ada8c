//! `diff` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{DeclarationDocument, Discrepancy};
use doc_loader::DocumentLoader;
use serde::Serialize;
use tracing::info;

use crate::cli::DiffArgs;
use crate::error::{ensure_exists, CliError};

/// Diff result for JSON output
#[derive(Serialize)]
struct DiffReport {
    expected: String,
    actual: String,
    identical: bool,
    discrepancies: Vec<DiscrepancyEntry>,
}

/// Discrepancy as reported, plus its human-readable message
#[derive(Serialize)]
struct DiscrepancyEntry {
    #[serde(flatten)]
    discrepancy: Discrepancy,
    message: String,
}

impl From<Discrepancy> for DiscrepancyEntry {
    fn from(discrepancy: Discrepancy) -> Self {
        let message = discrepancy.kind.to_string();
        Self {
            discrepancy,
            message,
        }
    }
}

/// Execute the `diff` command
pub fn run_diff(args: &DiffArgs) -> Result<()> {
    info!(
        expected = %args.expected.display(),
        actual = %args.actual.display(),
        "Comparing declaration documents"
    );

    let expected = load(&args.expected)?;
    let actual = load(&args.actual)?;
    let report = build_report(args, &expected, &actual);

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize diff result")?;
        println!("{}", json);
    } else {
        print_diff_report(&report);
    }

    if report.identical {
        Ok(())
    } else {
        Err(CliError::documents_differ(report.discrepancies.len()).into())
    }
}

/// Parse without validating; malformed documents are still comparable
fn load(path: &Path) -> Result<DeclarationDocument> {
    ensure_exists(path)?;
    DocumentLoader::parse_from_path(path)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to load document from {}", path.display()))
}

fn build_report(
    args: &DiffArgs,
    expected: &DeclarationDocument,
    actual: &DeclarationDocument,
) -> DiffReport {
    let discrepancies: Vec<DiscrepancyEntry> = interop_engine::diff(expected, actual)
        .into_iter()
        .map(DiscrepancyEntry::from)
        .collect();

    DiffReport {
        expected: args.expected.display().to_string(),
        actual: args.actual.display().to_string(),
        identical: discrepancies.is_empty(),
        discrepancies,
    }
}

fn print_diff_report(report: &DiffReport) {
    if report.identical {
        println!("✓ {} matches {}", report.actual, report.expected);
        return;
    }

    println!(
        "✗ {} differs from {} ({} discrepancy(ies)):",
        report.actual,
        report.expected,
        report.discrepancies.len()
    );
    for entry in &report.discrepancies {
        println!("  - {}", entry.discrepancy);
    }
}
