//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// One or more documents failed validation
    #[error("Validation failed with {count} problem(s)")]
    ValidationFailed { count: usize },

    /// Expected and actual documents differ
    #[error("Documents differ: {count} discrepancy(ies)")]
    DocumentsDiffer { count: usize },

    /// Rendered output does not match the golden file
    #[error("Output differs from {path} at line {line}:\n  expected: {expected}\n  actual:   {actual}")]
    GoldenMismatch {
        path: String,
        line: usize,
        expected: String,
        actual: String,
    },

    /// Library error
    #[error(transparent)]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn validation_failed(count: usize) -> Self {
        Self::ValidationFailed { count }
    }

    pub fn documents_differ(count: usize) -> Self {
        Self::DocumentsDiffer { count }
    }

    pub fn golden_mismatch(
        path: impl Into<String>,
        line: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::GoldenMismatch {
            path: path.into(),
            line,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Fail early with a readable message instead of an OS error
pub fn ensure_exists(path: &std::path::Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::file_not_found(path.display().to_string()))
    }
}
