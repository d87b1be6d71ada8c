//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// interop-decl - Elm interop declaration toolkit
#[derive(Parser, Debug)]
#[command(
    name = "interop-decl",
    author,
    version,
    about = "Validate, diff and render Elm port/flag declarations",
    long_about = "Checks declaration documents describing the flags and ports an Elm program \n\
                  exchanges with its JavaScript host, compares two of them, and renders \n\
                  the TypeScript declaration file for a batch."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "INTEROP_DECL_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        env = "INTEROP_DECL_QUIET"
    )]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "INTEROP_DECL_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one or more declaration documents
    Validate(ValidateArgs),

    /// Compare an expected document against an actual one
    Diff(DiffArgs),

    /// Render the TypeScript declaration file for a batch of documents
    Render(RenderArgs),

    /// Display a summary of a declaration document
    Info(InfoArgs),
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Declaration documents to validate (TOML or JSON)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `diff` command
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Reference document
    pub expected: PathBuf,

    /// Document under test
    pub actual: PathBuf,

    /// Output discrepancies as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `render` command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Declaration documents to render into one file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(short, long, env = "INTEROP_DECL_OUT")]
    pub out: Option<PathBuf>,

    /// Renderer options file (TOML or JSON)
    #[arg(long, env = "INTEROP_DECL_OPTIONS")]
    pub options: Option<PathBuf>,

    /// Override the outer module name
    #[arg(long, env = "INTEROP_DECL_MODULE_NAME")]
    pub module_name: Option<String>,

    /// Compare output against a golden file instead of writing it
    #[arg(long, conflicts_with = "out")]
    pub check: Option<PathBuf>,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Declaration document
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
